//! Logging macros. Context values are anything that implements `Display`.

/// Formats `key => value` pairs and hands them to a `*_with_context` function
#[doc(hidden)]
#[macro_export]
macro_rules! __with_log_context {
    ($sink:expr; $($arg:expr),* ; $($key:expr => $value:expr),*) => {{
        let owned: Vec<(&str, String)> = vec![$(($key, $value.to_string())),*];
        let pairs: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $sink($($arg,)* pairs)
    }};
}

/// `log_error!(code, "message", "key" => value, ...)`
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__with_log_context!(
            $crate::logging::log_error_with_context; $code, $message; $($key => $value),*
        )
    };
}

/// `log_success!(code, "message", "key" => value, ...)`
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__with_log_context!(
            $crate::logging::log_success_with_context; $code, $message; $($key => $value),*
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__with_log_context!(
            $crate::logging::log_info_with_context; $message; $($key => $value),*
        )
    };
}

/// Warnings carry a code only when one is given with `code = ...`
#[macro_export]
macro_rules! log_warning {
    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__with_log_context!(
            $crate::logging::log_warning_with_context; Some($code), $message; $($key => $value),*
        )
    };
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__with_log_context!(
            $crate::logging::log_warning_with_context; None, $message; $($key => $value),*
        )
    };
}

/// Context values are only formatted when debug output is on
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            if let Some(logger) = $crate::logging::try_get_global_logger() {
                #[allow(unused_mut)]
                let mut event = $crate::logging::LogEvent::debug($message);
                $( event = event.with_context($key, &$value.to_string()); )*
                logger.log_event($crate::logging::attach_file_context(event));
            }
        }
    }};
}

/// Timed success event; dropped when performance events are switched off
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::config::log_performance_events() {
            $crate::log_success!($code, $message,
                "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0)
                $(, $key => $value)*
            );
        }
    };
}
