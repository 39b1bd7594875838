//! Fixed-capacity, NUL-padded strings for kernel name and consumer fields.

#[derive(Clone, Copy)]
pub struct FixedStr<const N: usize> {
    s: [u8; N],
}

impl<const N: usize> FixedStr<N> {
    #[inline]
    pub const fn empty() -> Self {
        Self { s: [0; N] }
    }

    /// Build from a Rust string, failing if it does not fit with room for
    /// the trailing NUL.
    pub fn new(s: &str) -> Result<Self, FixedStrErr> {
        if s.len() >= N {
            return Err(FixedStrErr::CapacityOverflow {
                capacity: N,
                required: s.len() + 1,
            });
        }
        let mut f = Self::empty();
        f.s[..s.len()].copy_from_slice(s.as_bytes());
        Ok(f)
    }

    /// Build from a kernel-filled byte array, validating the bytes up to the
    /// first NUL as UTF-8 and zeroing the tail.
    pub fn from_byte_array(mut bytes: [u8; N]) -> Result<Self, FixedStrErr> {
        let nul = bytes.iter().position(|c| *c == 0).unwrap_or(N);
        let _ = core::str::from_utf8(&bytes[..nul])?;
        if nul < N {
            bytes[nul..].fill(0);
        }
        Ok(Self { s: bytes })
    }

    pub const fn into_byte_array(self) -> [u8; N] {
        self.s
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.s.iter().position(|c| *c == 0).unwrap_or(N)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.s[0] == 0
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        let s = &self.s[..self.len()];
        // Contents were UTF-8 checked on construction
        unsafe { std::str::from_utf8_unchecked(s) }
    }
}

impl<const N: usize> Default for FixedStr<N> {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> std::fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FixedStr").field(&self.as_str()).finish()
    }
}

impl<const N: usize> std::fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

impl<const N: usize> AsRef<str> for FixedStr<N> {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum FixedStrErr {
    #[error(
        "Exceeded fixed string size: required {required} bytes with only {capacity} available"
    )]
    CapacityOverflow { capacity: usize, required: usize },
    #[error("UTF8 Error")]
    Utf8(#[from] core::str::Utf8Error),
}

impl From<FixedStrErr> for std::io::Error {
    fn from(value: FixedStrErr) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_byte_array() {
        let s = FixedStr::<32>::new("button-demo").unwrap();
        let arr = s.into_byte_array();
        assert_eq!(arr[11], 0);
        let back = FixedStr::<32>::from_byte_array(arr).unwrap();
        assert_eq!(back.as_str(), "button-demo");
    }

    #[test]
    fn rejects_overlong_consumer_names() {
        let long = "x".repeat(32);
        assert!(FixedStr::<32>::new(&long).is_err());
        let ok = "x".repeat(31);
        assert_eq!(FixedStr::<32>::new(&ok).unwrap().len(), 31);
    }

    #[test]
    fn unterminated_array_is_full_length() {
        let s = FixedStr::<4>::from_byte_array(*b"abcd").unwrap();
        assert_eq!(s.as_str(), "abcd");
        assert!(!s.is_empty());
        assert!(FixedStr::<4>::empty().is_empty());
    }
}
