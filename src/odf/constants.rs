//! ODF constants, MIME types, and container paths.
//!
//! Compile-time maps use `phf` so lookups cost nothing at startup.

use phf::{Map, phf_map};

/// ODF version written on freshly created part roots
pub const OFFICE_VERSION: &str = "1.3";

// ============================================================================
// MIME TYPES
// ============================================================================

/// MIME type for OpenDocument Text (.odt)
pub const ODF_TEXT: &str = "application/vnd.oasis.opendocument.text";

/// MIME type for OpenDocument Spreadsheet (.ods)
pub const ODF_SPREADSHEET: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// MIME type for OpenDocument Presentation (.odp)
pub const ODF_PRESENTATION: &str = "application/vnd.oasis.opendocument.presentation";

/// MIME type for OpenDocument Drawing (.odg)
pub const ODF_DRAWING: &str = "application/vnd.oasis.opendocument.graphics";

/// MIME type for OpenDocument Chart (.odc)
pub const ODF_CHART: &str = "application/vnd.oasis.opendocument.chart";

/// MIME type for OpenDocument Image (.odi)
pub const ODF_IMAGE: &str = "application/vnd.oasis.opendocument.image";

/// Fallback media type for embedded files of unknown kind
pub const OCTET_STREAM: &str = "application/octet-stream";

// ============================================================================
// STANDARD ODF PARTS PATHS
// ============================================================================

/// Path of the raw MIME type entry (must be first and stored)
pub const ODF_MIMETYPE: &str = "mimetype";

/// Path to content.xml (main document content)
pub const ODF_CONTENT: &str = "content.xml";

/// Path to meta.xml (document metadata)
pub const ODF_META: &str = "meta.xml";

/// Path to settings.xml (application settings)
pub const ODF_SETTINGS: &str = "settings.xml";

/// Path to styles.xml (document styles)
pub const ODF_STYLES: &str = "styles.xml";

/// Path to manifest.xml (package manifest)
pub const ODF_MANIFEST: &str = "META-INF/manifest.xml";

/// Directory embedded pictures are stored under
pub const ODF_PICTURES: &str = "Pictures/";

/// Style every synthesized automatic style inherits from
pub const DEFAULT_PARENT_STYLE: &str = "Standard";

// ============================================================================
// EMBEDDED FILE MEDIA TYPES
// ============================================================================

/// File extension to media type mapping for embedded files
pub static MEDIA_TYPES: Map<&'static str, &'static str> = phf_map! {
    "png" => "image/png",
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "svg" => "image/svg+xml",
    "bmp" => "image/bmp",
    "tif" => "image/tiff",
    "tiff" => "image/tiff",
    "webp" => "image/webp",
    "wmf" => "image/x-wmf",
    "emf" => "image/x-emf",
    "xml" => "text/xml",
    "rdf" => "application/rdf+xml",
};

/// Guess the media type of an embedded file from its path.
///
/// # Examples
///
/// ```
/// use opendocument::odf::constants::guess_media_type;
///
/// assert_eq!(guess_media_type("Pictures/logo.PNG"), "image/png");
/// assert_eq!(guess_media_type("blob"), "application/octet-stream");
/// ```
pub fn guess_media_type(path: &str) -> &'static str {
    path.rsplit_once('.')
        .and_then(|(_, ext)| MEDIA_TYPES.get(ext.to_ascii_lowercase().as_str()).copied())
        .unwrap_or(OCTET_STREAM)
}
