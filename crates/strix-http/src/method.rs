use std::fmt;
use std::str::FromStr;

use crate::HttpError;

/// The request method (verb).
///
/// The eight methods of RFC 7231 plus PATCH; anything else a peer sends
/// lands in `Extension` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum Method {
    Options,
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Trace,
    Connect,
    Patch,
    /// Method extensions, e.g. `Extension("PROPFIND".to_string())`.
    Extension(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Options => "OPTIONS",
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
            Method::Patch => "PATCH",
            Method::Extension(s) => s.as_str(),
        }
    }

    /// Whether the method is "safe" in the RFC 7231 sense, i.e. the
    /// request is essentially read-only.
    pub fn safe(&self) -> bool {
        matches!(
            self,
            Method::Get | Method::Head | Method::Options | Method::Trace
        )
    }

    /// Whether repeating the request has the same effect as sending it
    /// once.
    pub fn idempotent(&self) -> bool {
        self.safe() || matches!(self, Method::Put | Method::Delete)
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Method {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Method, HttpError> {
        if s.is_empty() {
            return Err(HttpError::Method);
        }
        Ok(match s {
            "OPTIONS" => Method::Options,
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "HEAD" => Method::Head,
            "TRACE" => Method::Trace,
            "CONNECT" => Method::Connect,
            "PATCH" => Method::Patch,
            _ => Method::Extension(s.to_owned()),
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parse_roundtrip() {
        for method in Method::iter() {
            if matches!(method, Method::Extension(_)) {
                continue;
            }
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn unknown_token_is_extension() {
        let m: Method = "PROPFIND".parse().unwrap();
        assert_eq!(m, Method::Extension("PROPFIND".to_string()));
        assert_eq!(m.as_str(), "PROPFIND");
    }

    #[test]
    fn empty_token_is_an_error() {
        assert!("".parse::<Method>().is_err());
    }

    #[test]
    fn safety_and_idempotence() {
        assert!(Method::Get.safe());
        assert!(!Method::Post.safe());
        assert!(Method::Put.idempotent());
        assert!(Method::Delete.idempotent());
        assert!(!Method::Post.idempotent());
    }
}
