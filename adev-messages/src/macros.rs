/// Render a message template, substituting `{key}` placeholders.
///
/// ```rust
/// use adev_messages::{msg, MESSAGES};
///
/// let text = msg!(MESSAGES.vm.bringing_online, name = "debian");
/// assert!(text.contains("debian"));
/// ```
#[macro_export]
macro_rules! msg {
    ($template:expr) => {
        $crate::builder::MessageBuilder::new($template).build()
    };
    ($template:expr, $($key:ident = $value:expr),+ $(,)?) => {
        {
            let mut builder = $crate::builder::MessageBuilder::new($template);
            $(
                builder = builder.var(stringify!($key), $value);
            )+
            builder.build()
        }
    };
}
