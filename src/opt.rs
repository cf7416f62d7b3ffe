use crate::error::{Error, IResult};

/// Expected element count used by `Options::default()`.
const DEFAULT_EXPECTED_LEN: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// maximum number of levels above the base level. promotion stops here.
    pub max_height: usize,
}

impl Options {
    /// Derives the height cap from how many keys the list is expected to hold.
    /// With p = 1/2 the expected height is log2(n), so that is where we cap it.
    pub fn with_expected_len(expected_len: usize) -> Self {
        Options {
            max_height: ceil_log2(expected_len).max(1),
        }
    }

    pub fn validate(&self) -> IResult<()> {
        if self.max_height == 0 {
            return Err(Error::Config("max_height must be at least 1".to_owned()));
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::with_expected_len(DEFAULT_EXPECTED_LEN)
    }
}

fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    (usize::BITS - (n - 1).leading_zeros()) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_len_to_height() {
        let cases = vec![(0, 1), (1, 1), (2, 1), (3, 2), (4, 2), (5, 3), (1000, 10), (1 << 16, 16)];
        for (n, expect) in cases {
            assert_eq!(Options::with_expected_len(n).max_height, expect, "{}", n);
        }
        assert_eq!(Options::default().max_height, 16);
    }

    #[test]
    fn test_validate() {
        assert!(Options::default().validate().is_ok());
        let opts = Options { max_height: 0 };
        assert!(matches!(opts.validate(), Err(Error::Config(_))));
    }
}
