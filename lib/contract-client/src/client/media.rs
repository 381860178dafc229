//! Media type predicates shared by content negotiation and response classification.

use mime::Mime;

/// Returns `true` if the media type is JSON-compatible.
///
/// JSON-compatible media types are `application/json` and vendor types such as
/// `application/vnd.acme.v2+json`. Parameters (e.g. `charset`) are ignored.
///
/// # Example
///
/// ```rust
/// use contract_client::is_json_media_type;
///
/// let vendor: mime::Mime = "application/vnd.acme.v2+json".parse().expect("valid media type");
/// assert!(is_json_media_type(&vendor));
/// assert!(!is_json_media_type(&mime::TEXT_PLAIN));
/// ```
pub fn is_json_media_type(media_type: &Mime) -> bool {
    if media_type.type_() != mime::APPLICATION {
        return false;
    }

    let subtype = media_type.subtype().as_str();
    match media_type.suffix() {
        None => subtype == "json",
        Some(suffix) => {
            suffix == mime::JSON
                && subtype
                    .strip_prefix("vnd.")
                    .is_some_and(|vendor| !vendor.is_empty())
        }
    }
}

/// Checks whether an actual media type satisfies the media type declared in the contract.
///
/// A declared `*/*` matches anything, `type/*` matches any subtype of `type`, otherwise
/// type and subtype must match exactly.
pub(in crate::client) fn is_compatible(actual: &Mime, declared: &Mime) -> bool {
    if declared.type_() == mime::STAR {
        return true;
    }

    declared.type_() == actual.type_()
        && (declared.subtype() == mime::STAR
            || (declared.subtype() == actual.subtype() && declared.suffix() == actual.suffix()))
}

pub(in crate::client) fn parse(media_type: &str) -> Result<Mime, super::ApiClientError> {
    media_type
        .parse()
        .map_err(|error| super::ApiClientError::InvalidMediaType {
            media_type: media_type.to_string(),
            error,
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn mime(value: &str) -> Mime {
        value.parse().expect("valid media type")
    }

    #[rstest]
    #[case("application/json", true)]
    #[case("application/json; charset=utf-8", true)]
    #[case("application/vnd.acme.v2+json", true)]
    #[case("application/vnd.github+json", true)]
    #[case("application/vnd.+json", false)]
    #[case("application/problem+json", false)]
    #[case("application/xml", false)]
    #[case("application/octet-stream", false)]
    #[case("text/json", false)]
    #[case("text/plain", false)]
    fn test_is_json_media_type(#[case] media_type: &str, #[case] expected: bool) {
        assert_eq!(is_json_media_type(&mime(media_type)), expected);
    }

    #[rstest]
    #[case("application/json", "application/json", true)]
    #[case("application/json", "application/*", true)]
    #[case("application/json", "*/*", true)]
    #[case("image/png", "*/*", true)]
    #[case("application/json; charset=utf-8", "application/json", true)]
    #[case("application/vnd.acme.v2+json", "application/vnd.acme.v2+json", true)]
    #[case("application/vnd.acme.v2+json", "application/vnd.acme.v1+json", false)]
    #[case("text/plain", "application/*", false)]
    #[case("text/plain", "application/json", false)]
    #[case("application/pdf", "application/json", false)]
    fn test_is_compatible(#[case] actual: &str, #[case] declared: &str, #[case] expected: bool) {
        assert_eq!(is_compatible(&mime(actual), &mime(declared)), expected);
    }

    #[test]
    fn test_parse_invalid_media_type() {
        let result = parse("not a media type");

        let error = result.expect_err("should fail");
        assert!(matches!(
            error,
            super::super::ApiClientError::InvalidMediaType { ref media_type, .. } if media_type == "not a media type"
        ));
    }
}
