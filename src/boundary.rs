use crate::constants;

/// A multipart boundary stored as `\r\n--{boundary}`, together with the set of
/// byte values that occur anywhere in it.
#[derive(Clone)]
pub(crate) struct Boundary {
    pattern: Vec<u8>,
    members: [bool; 256],
}

impl Boundary {
    pub(crate) fn new(token: &str) -> crate::Result<Self> {
        if token.is_empty() {
            return Err(crate::Error::EmptyBoundary);
        }

        let mut pattern = Vec::with_capacity(constants::CRLF.len() + constants::BOUNDARY_EXT.len() + token.len());
        pattern.extend_from_slice(constants::CRLF);
        pattern.extend_from_slice(constants::BOUNDARY_EXT);
        pattern.extend_from_slice(token.as_bytes());

        let mut members = [false; 256];
        for &b in &pattern {
            members[b as usize] = true;
        }

        Ok(Boundary { pattern, members })
    }

    /// Length of the full `\r\n--{boundary}` pattern.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.pattern.len()
    }

    #[inline]
    pub(crate) fn at(&self, idx: usize) -> u8 {
        self.pattern[idx]
    }

    #[inline]
    pub(crate) fn contains(&self, b: u8) -> bool {
        self.members[b as usize]
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.pattern
    }
}

impl std::fmt::Debug for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Boundary")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_pattern() {
        let boundary = Boundary::new("abcd").unwrap();
        assert_eq!(boundary.as_bytes(), b"\r\n--abcd");
        assert_eq!(boundary.len(), 8);
        assert_eq!(boundary.at(4), b'a');
    }

    #[test]
    fn test_boundary_members() {
        let boundary = Boundary::new("X-Y").unwrap();
        for &b in b"\r\n-XY" {
            assert!(boundary.contains(b));
        }
        assert!(!boundary.contains(b'x'));
        assert!(!boundary.contains(b' '));
    }

    #[test]
    fn test_empty_boundary() {
        assert_eq!(Boundary::new("").unwrap_err(), crate::Error::EmptyBoundary);
    }
}
