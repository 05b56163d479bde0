//! Output macros for the ansible-dev CLI.
//!
//! Progress goes to stdout, status lines to stderr, so piping the output of
//! the delegated programs stays clean. Templates live in `adev-messages`.

#[macro_export]
macro_rules! adev_print {
    ($($arg:tt)*) => {{
        use ::std::io::Write as _;
        print!("{}", format!($($arg)*));
        let _ = ::std::io::stdout().flush();
    }};
}

#[macro_export]
macro_rules! adev_println {
    () => {
        println!();
    };
    ($($arg:tt)*) => {
        println!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! adev_error {
    ($($arg:tt)*) => {
        eprintln!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! adev_success {
    ($($arg:tt)*) => {
        eprintln!("✓ {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! adev_info {
    ($($arg:tt)*) => {
        eprintln!("ℹ {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! adev_warning {
    ($($arg:tt)*) => {
        eprintln!("⚠ {}", format!($($arg)*));
    };
}
