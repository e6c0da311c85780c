/// Clamp an optional list limit into `1..=max`, falling back to `default`.
pub fn validate_limit(limit: Option<u64>, default: u64, max: u64) -> u64 {
    limit.unwrap_or(default).clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(validate_limit(None, 100, 1000), 100);
        assert_eq!(validate_limit(Some(0), 100, 1000), 1);
        assert_eq!(validate_limit(Some(5000), 100, 1000), 1000);
        assert_eq!(validate_limit(Some(25), 100, 1000), 25);
    }
}
