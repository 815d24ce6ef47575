//! Hardware facts for the report. Stateless queries, no retained state.

pub fn cpu_core_count() -> usize {
    num_cpus::get()
}

/// Whether an accelerated transform backend was compiled in. Purely a
/// build-time fact; the bundled transforms are CPU-only.
pub fn has_accelerated_backend() -> bool {
    cfg!(feature = "accel")
}

#[cfg(test)]
mod tests {
    #[test]
    fn core_count_is_positive() {
        assert!(super::cpu_core_count() >= 1);
    }
}
