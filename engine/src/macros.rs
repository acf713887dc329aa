/// Time a block and report the elapsed wall time at debug level.
#[macro_export]
macro_rules! profile {
    ($description:expr, $block:expr) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let elapsed = start.elapsed();
        $crate::logging::debug!(elapsed = ?elapsed, "[{}] finished", $description);
        result
    }};
}
