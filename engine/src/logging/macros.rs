/// Log through `tracing` when the scope's configured level allows it.
///
/// `$level` is one of `error`, `warn`, `info`, `debug`, `trace`.
#[macro_export]
macro_rules! scoped_log {
    (@level error) => { $crate::logging::Level::ERROR };
    (@level warn) => { $crate::logging::Level::WARN };
    (@level info) => { $crate::logging::Level::INFO };
    (@level debug) => { $crate::logging::Level::DEBUG };
    (@level trace) => { $crate::logging::Level::TRACE };
    ($level:ident, $scope:expr, $($arg:tt)*) => {{
        if $crate::logging::scope_enabled($scope, $crate::scoped_log!(@level $level)) {
            $crate::logging::$level!(scope = $scope, $($arg)*);
        }
    }};
}

#[macro_export]
macro_rules! teleport_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::scope::TELEPORT, $($arg)*)
    };
}

#[macro_export]
macro_rules! physics_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::scope::PHYSICS, $($arg)*)
    };
}

#[macro_export]
macro_rules! config_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::scope::CONFIG, $($arg)*)
    };
}

#[macro_export]
macro_rules! command_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::scope::COMMAND, $($arg)*)
    };
}
