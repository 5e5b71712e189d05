#[cfg(test)]
mod tests {
    use crate::error::StudyError;
    use crate::supervisor::Supervisor;

    #[test]
    fn test_supervisor_passes_through_success() {
        let sup = Supervisor::new("test");
        assert_eq!(sup.run(|| Ok::<_, StudyError>(42)), Some(42));
        assert!(!sup.has_failed());
        assert_eq!(sup.failure_count(), 0);
    }

    #[test]
    fn test_supervisor_captures_error_until_reset() {
        let sup = Supervisor::new("test");

        let out: Option<u32> = sup.run(|| Err(StudyError::new("boom", "compute")));
        assert!(out.is_none());
        assert!(sup.has_failed());
        assert_eq!(sup.last_error().map(|e| e.message), Some("boom".to_string()));

        // Tripped: the step is not invoked again
        let mut called = false;
        let out = sup.run(|| {
            called = true;
            Ok::<_, StudyError>(1)
        });
        assert!(out.is_none());
        assert!(!called);

        sup.reset();
        assert!(!sup.has_failed());
        assert_eq!(sup.run(|| Ok::<_, StudyError>(7)), Some(7));
        assert_eq!(sup.failure_count(), 1);
    }

    #[test]
    fn test_supervisor_captures_panic() {
        let sup = Supervisor::new("test");
        let out: Option<u32> = sup.run(|| panic!("render exploded"));
        assert!(out.is_none());
        let err = sup.last_error().expect("panic recorded");
        assert_eq!(err.stage, "supervisor");
        assert!(err.message.contains("render exploded"));
    }
}
