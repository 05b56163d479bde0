use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{Duration, Instant};

use adev_core::error::{AdevError, Result};
use pnet::packet::icmp::echo_reply::EchoReplyPacket;
use pnet::packet::icmp::echo_request::{IcmpCodes, MutableEchoRequestPacket};
use pnet::packet::icmp::{checksum, IcmpPacket, IcmpTypes};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::Packet;
use pnet::transport::{
    icmp_packet_iter, transport_channel, TransportChannelType::Layer4, TransportProtocol::Ipv4,
};
use tracing::{debug, trace};

use super::{resolve_ipv4, Prober};

const ECHO_HEADER_LEN: usize = 8;
const PAYLOAD: &[u8] = b"ansible-dev-probe";
const CHANNEL_BUFFER: usize = 4096;

/// Raw-socket ICMP echo. Needs root or `CAP_NET_RAW`.
///
/// A fresh channel is opened for every probe and closed when it returns.
#[derive(Debug)]
pub struct IcmpProber {
    timeout: Duration,
    identifier: u16,
    sequence: AtomicU16,
}

impl IcmpProber {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            identifier: (std::process::id() & 0xffff) as u16,
            sequence: AtomicU16::new(1),
        }
    }

    fn echo(&self, target: Ipv4Addr) -> Result<bool> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);

        let (mut tx, mut rx) = transport_channel(
            CHANNEL_BUFFER,
            Layer4(Ipv4(IpNextHeaderProtocols::Icmp)),
        )
        .map_err(|e| {
            AdevError::Probe(format!(
                "Unable to open an ICMP socket ({e}). Run with CAP_NET_RAW/root or set 'probe.method: command'"
            ))
        })?;

        let mut buffer = [0u8; ECHO_HEADER_LEN + PAYLOAD.len()];
        let request = build_echo_request(&mut buffer, self.identifier, sequence)?;
        if !echo_sent(tx.send_to(request, IpAddr::V4(target)), target) {
            return Ok(false);
        }
        trace!(%target, identifier = self.identifier, sequence, "echo request sent");

        let deadline = Instant::now() + self.timeout;
        let mut replies = icmp_packet_iter(&mut rx);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(false);
            }

            match replies.next_with_timeout(remaining) {
                Ok(Some((packet, source))) => {
                    if is_matching_reply(&packet, source, target, self.identifier, sequence) {
                        return Ok(true);
                    }
                    trace!(%source, "ignoring unrelated ICMP packet");
                }
                Ok(None) => return Ok(false),
                Err(e) => {
                    debug!("ICMP receive from {} failed: {}", target, e);
                    return Ok(false);
                }
            }
        }
    }
}

fn build_echo_request(
    buffer: &mut [u8],
    identifier: u16,
    sequence: u16,
) -> Result<MutableEchoRequestPacket<'_>> {
    let mut packet = MutableEchoRequestPacket::new(buffer)
        .ok_or_else(|| AdevError::Probe("ICMP buffer too small".to_string()))?;
    packet.set_icmp_type(IcmpTypes::EchoRequest);
    packet.set_icmp_code(IcmpCodes::NoCode);
    packet.set_identifier(identifier);
    packet.set_sequence_number(sequence);
    packet.set_payload(PAYLOAD);

    let sum = IcmpPacket::new(packet.packet())
        .map(|icmp| checksum(&icmp))
        .ok_or_else(|| AdevError::Probe("ICMP buffer too small".to_string()))?;
    packet.set_checksum(sum);
    Ok(packet)
}

/// A send failure on an open socket (no route yet, host unreachable) only
/// fails this attempt.
fn echo_sent(result: std::io::Result<usize>, target: Ipv4Addr) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            debug!("ICMP send to {} failed: {}", target, e);
            false
        }
    }
}

fn is_matching_reply(
    packet: &IcmpPacket<'_>,
    source: IpAddr,
    target: Ipv4Addr,
    identifier: u16,
    sequence: u16,
) -> bool {
    if source != IpAddr::V4(target) || packet.get_icmp_type() != IcmpTypes::EchoReply {
        return false;
    }
    EchoReplyPacket::new(packet.packet())
        .map(|reply| {
            reply.get_identifier() == identifier && reply.get_sequence_number() == sequence
        })
        .unwrap_or(false)
}

impl Prober for IcmpProber {
    fn probe(&self, address: &str) -> Result<bool> {
        match resolve_ipv4(address)? {
            Some(target) => self.echo(target),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::packet::icmp::echo_reply::MutableEchoReplyPacket;

    fn reply_bytes(identifier: u16, sequence: u16) -> Vec<u8> {
        let mut buffer = vec![0u8; ECHO_HEADER_LEN + PAYLOAD.len()];
        let mut reply = MutableEchoReplyPacket::new(&mut buffer).unwrap();
        reply.set_icmp_type(IcmpTypes::EchoReply);
        reply.set_identifier(identifier);
        reply.set_sequence_number(sequence);
        buffer
    }

    #[test]
    fn echo_request_has_valid_checksum() {
        let mut buffer = [0u8; ECHO_HEADER_LEN + PAYLOAD.len()];
        let request = build_echo_request(&mut buffer, 0x1234, 7).unwrap();
        assert_eq!(request.get_identifier(), 0x1234);
        assert_eq!(request.get_sequence_number(), 7);

        let icmp = IcmpPacket::new(request.packet()).unwrap();
        assert_eq!(checksum(&icmp), icmp.get_checksum());
    }

    #[test]
    fn reply_must_match_source_identifier_and_sequence() {
        let target = Ipv4Addr::new(192, 168, 57, 5);
        let bytes = reply_bytes(42, 3);
        let packet = IcmpPacket::new(&bytes).unwrap();

        assert!(is_matching_reply(&packet, IpAddr::V4(target), target, 42, 3));
        assert!(!is_matching_reply(
            &packet,
            IpAddr::V4(Ipv4Addr::new(192, 168, 57, 6)),
            target,
            42,
            3
        ));
        assert!(!is_matching_reply(&packet, IpAddr::V4(target), target, 43, 3));
        assert!(!is_matching_reply(&packet, IpAddr::V4(target), target, 42, 4));
    }

    #[test]
    fn echo_request_is_not_a_reply() {
        let target = Ipv4Addr::LOCALHOST;
        let mut buffer = [0u8; ECHO_HEADER_LEN + PAYLOAD.len()];
        let request = build_echo_request(&mut buffer, 42, 3).unwrap();
        let packet = IcmpPacket::new(request.packet()).unwrap();

        assert!(!is_matching_reply(&packet, IpAddr::V4(target), target, 42, 3));
    }

    #[test]
    fn send_failure_counts_as_unreachable() {
        let target = Ipv4Addr::new(192, 0, 2, 255);
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let no_route = std::io::Error::from_raw_os_error(113);

        assert!(!echo_sent(Err(denied), target));
        assert!(!echo_sent(Err(no_route), target));
        assert!(echo_sent(Ok(ECHO_HEADER_LEN + PAYLOAD.len()), target));
    }

    #[test]
    fn unresolvable_host_is_unreachable() {
        let prober = IcmpProber::new(Duration::from_millis(10));
        assert!(!prober.probe("no-such-host.invalid").unwrap());
    }
}
