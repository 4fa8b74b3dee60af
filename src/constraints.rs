use crate::size_limit::SizeLimit;

/// Represents some rules to be applied on the stream and field's content size
/// to prevent DoS attacks.
///
/// # Examples
///
/// ```
/// use partwise::{Constraints, FormData, SizeLimit};
///
/// let constraints = Constraints::new()
///     .allowed_fields(vec!["email", "avatar"])
///     .size_limit(SizeLimit::new().whole_stream(15 * 1024 * 1024).for_field("email", 256));
///
/// let body = "--X\r\nContent-Disposition: form-data; name=\"email\"\r\n\r\na@b.c\r\n--X--\r\n";
/// let form = FormData::from_bytes_with_constraints(body.as_bytes(), "X", constraints).unwrap();
///
/// assert_eq!(form.text("email"), Some("a@b.c"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub(crate) size_limit: SizeLimit,
    pub(crate) allowed_fields: Option<Vec<String>>,
}

impl Constraints {
    /// Creates a set of rules with default behaviour.
    pub fn new() -> Constraints {
        Constraints::default()
    }

    /// Applies rules on the stream and field's content size.
    pub fn size_limit(self, size_limit: SizeLimit) -> Constraints {
        Constraints {
            size_limit,
            allowed_fields: self.allowed_fields,
        }
    }

    /// Specify which fields are allowed, for any unknown field the parser
    /// fails with [`Error::UnknownField`](crate::Error::UnknownField).
    pub fn allowed_fields<N: Into<String>>(self, allowed_fields: Vec<N>) -> Constraints {
        let allowed_fields = allowed_fields.into_iter().map(|item| item.into()).collect();

        Constraints {
            size_limit: self.size_limit,
            allowed_fields: Some(allowed_fields),
        }
    }

    pub(crate) fn is_it_allowed(&self, field: Option<&str>) -> bool {
        if let Some(ref allowed_fields) = self.allowed_fields {
            field
                .map(|field| allowed_fields.iter().any(|item| item == field))
                .unwrap_or(false)
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_it_allowed() {
        let constraints = Constraints::new();
        assert!(constraints.is_it_allowed(Some("anything")));
        assert!(constraints.is_it_allowed(None));

        let constraints = Constraints::new().allowed_fields(vec!["a", "b"]);
        assert!(constraints.is_it_allowed(Some("a")));
        assert!(!constraints.is_it_allowed(Some("c")));
        assert!(!constraints.is_it_allowed(None));
    }
}
