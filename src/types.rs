use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// Content type marking note nodes that link to a Mendeley document.
pub const CONTENT_TYPE_MENDELEY_LINK: &str = "mendeley/link";

/// Node attribute holding the uuid of the linked Mendeley document.
pub const MENDELEY_UUID_ATTR: &str = "mendeley-uuid";

/// Node attribute naming the icon shown for the node.
pub const ICON_ATTR: &str = "icon";

/// Icon installed into the notebook and attached to link nodes.
pub const MENDELEY_ICON_NAME: &str = "mendeleydesktop.png";

/// A bibliographic record read from the Mendeley database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Stable identifier assigned by Mendeley.
    pub uuid: String,
    /// Contributor surnames joined with `", "`.
    pub authors: String,
    /// Publication year, if recorded.
    pub year: Option<i64>,
    pub title: String,
}

impl Reference {
    /// Formats the reference as `"<authors> - <year> - <title>"`, dropping the
    /// year segment when no year is recorded.
    ///
    /// Mendeley writes `0` for documents without a year, so a zero year is
    /// treated the same as a missing one.
    pub fn as_text_reference(&self) -> String {
        match self.year {
            Some(year) if year != 0 => format!("{} - {} - {}", self.authors, year, self.title),
            _ => format!("{} - {}", self.authors, self.title),
        }
    }

    /// Builds the note node a host inserts when this reference is picked.
    pub fn to_link_node(&self) -> LinkNode {
        LinkNode {
            title: self.as_text_reference(),
            content_type: CONTENT_TYPE_MENDELEY_LINK.to_string(),
            icon: MENDELEY_ICON_NAME.to_string(),
            uuid: self.uuid.clone(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text_reference())
    }
}

/// Description of a note node linking to a Mendeley document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkNode {
    pub title: String,
    pub content_type: String,
    pub icon: String,
    /// Stored on the node under [`MENDELEY_UUID_ATTR`].
    pub uuid: String,
}

impl LinkNode {
    /// Returns the attributes to set on the created node, keyed by the
    /// names the activation handler reads back.
    pub fn attributes(&self) -> [(&'static str, &str); 2] {
        [
            (ICON_ATTR, self.icon.as_str()),
            (MENDELEY_UUID_ATTR, self.uuid.as_str()),
        ]
    }

    /// Extracts the linked uuid from a node's attributes, if the node is a
    /// Mendeley link carrying one.
    pub fn linked_uuid<'a>(content_type: &str, attributes: &[(&str, &'a str)]) -> Option<&'a str> {
        if !Self::is_mendeley_link(content_type) {
            return None;
        }
        attributes
            .iter()
            .find(|(name, _)| *name == MENDELEY_UUID_ATTR)
            .map(|(_, value)| *value)
            .filter(|uuid| !uuid.is_empty())
    }

    /// Returns `true` if a node with this content type was created by us and
    /// should open its document when activated.
    pub fn is_mendeley_link(content_type: &str) -> bool {
        content_type == CONTENT_TYPE_MENDELEY_LINK
    }
}

/// Converts a `Files.localUrl` value into a filesystem path.
///
/// Mendeley stores `file://` URLs with percent-encoding; anything that does
/// not parse as a file URL is taken to be a plain path already.
pub fn local_url_to_path(local_url: &str) -> PathBuf {
    match Url::parse(local_url) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .unwrap_or_else(|_| PathBuf::from(local_url)),
        _ => PathBuf::from(local_url),
    }
}
