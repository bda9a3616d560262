use crate::cache::{LookupKey, ResolutionCache};
use crate::classifier::{IdentifierKind, SegmentClassifier};
use crate::label::{fixed_label, format_segment};
use crumbtrail_protocol::{href_for, is_root, BreadcrumbItem, ItemKind, HOME_LABEL, ROOT_HREF};

/// Builds the trail for `path` from whatever `cache` knows right now.
/// Pure: calling it twice against the same cache yields the same items.
#[must_use]
pub fn render_trail(path: &[String], cache: &ResolutionCache) -> Vec<BreadcrumbItem> {
    if is_root(path) {
        return Vec::new();
    }

    let last = path.len() - 1;
    let mut items = Vec::with_capacity(path.len() + 1);
    items.push(BreadcrumbItem {
        label: HOME_LABEL.to_string(),
        href: Some(ROOT_HREF.to_string()),
        kind: ItemKind::Home,
        resolving: false,
    });

    for segment in SegmentClassifier::classify(path) {
        let identifier = IdentifierKind::from_segment(segment.kind);
        let (label, resolving) = match (fixed_label(&segment.value), identifier) {
            (Some(fixed), _) => (fixed.to_string(), false),
            (None, Some(kind)) => match cache.label(kind, &segment.value) {
                Some(resolved) if !resolved.is_empty() => (resolved.to_string(), false),
                Some(_) => (format_segment(&segment.value), false),
                None => (
                    format_segment(&segment.value),
                    cache.is_in_flight(&LookupKey::new(kind, segment.value.as_str())),
                ),
            },
            (None, None) => (format_segment(&segment.value), false),
        };
        let href = (segment.position != last).then(|| href_for(path, segment.position));
        items.push(BreadcrumbItem {
            label,
            href,
            kind: segment.kind.into(),
            resolving,
        });
    }
    items
}

/// Labels joined the way the trail is shown on screen.
#[must_use]
pub fn trail_text(items: &[BreadcrumbItem]) -> String {
    items
        .iter()
        .map(|item| item.label.as_str())
        .collect::<Vec<_>>()
        .join(" › ")
}
