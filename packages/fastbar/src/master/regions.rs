/// Region of a master bar view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The primary bar (outer loop)
    Primary,
    /// Reported lines and table
    Text,
    /// The current child bar (inner loop)
    Child,
    /// Chart or image grid
    Chart,
}

/// Default order of the regions, from top to bottom
pub const DEFAULT_ORDER: [Region; 4] = [Region::Primary, Region::Text, Region::Child, Region::Chart];

/// Join the renderables of the regions in `order` that currently have content
pub(crate) fn compose<F>(order: &[Region], mut content: F) -> String
where
    F: FnMut(Region) -> Option<String>,
{
    order
        .iter()
        .filter_map(|r| content(*r))
        .collect::<Vec<_>>()
        .join("\n")
}
