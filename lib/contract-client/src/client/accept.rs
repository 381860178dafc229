use mime::Mime;

use super::media::is_json_media_type;

const NON_JSON_QUALITY: &str = "; q=0.5";

/// Computes the `Accept` header value for the acceptable media types.
///
/// JSON-compatible media types come first without weight, then the other media types
/// with `; q=0.5`, each group keeping the declaration order.
/// Returns `None` when there is no acceptable media type, the header is then omitted.
pub(in crate::client) fn accept_header_value<'a>(
    media_types: impl IntoIterator<Item = &'a Mime>,
) -> Option<String> {
    let (json, others): (Vec<&Mime>, Vec<&Mime>) = media_types
        .into_iter()
        .partition(|media_type| is_json_media_type(media_type));

    let values = json
        .into_iter()
        .map(ToString::to_string)
        .chain(
            others
                .into_iter()
                .map(|media_type| format!("{media_type}{NON_JSON_QUALITY}")),
        )
        .collect::<Vec<_>>();

    (!values.is_empty()).then(|| values.join(", "))
}
