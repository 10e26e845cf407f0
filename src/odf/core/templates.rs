//! Skeleton parts for new documents.
//!
//! Templates are generated in memory rather than read from template files,
//! so a freshly created document never depends on the file system.

/// Namespace declarations shared by content and styles
const BODY_NAMESPACES: &str = r#"xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
    xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0"
    xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0"
    xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0"
    xmlns:draw="urn:oasis:names:tc:opendocument:xmlns:drawing:1.0"
    xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0"
    xmlns:xlink="http://www.w3.org/1999/xlink"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:meta="urn:oasis:names:tc:opendocument:xmlns:meta:1.0"
    xmlns:number="urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0"
    xmlns:svg="urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0""#;

/// Helper to create the standard parts of a text document
pub struct OdfStructure;

impl OdfStructure {
    /// Default content.xml: empty automatic styles and an empty text body.
    pub fn text_content_xml(office_version: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content {BODY_NAMESPACES} office:version="{office_version}">
  <office:scripts/>
  <office:font-face-decls/>
  <office:automatic-styles/>
  <office:body>
    <office:text/>
  </office:body>
</office:document-content>
"#
        )
    }

    /// Default styles.xml, defining the `Standard` paragraph style that
    /// generated automatic styles inherit from.
    pub fn text_styles_xml(office_version: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-styles {BODY_NAMESPACES} office:version="{office_version}">
  <office:font-face-decls/>
  <office:styles>
    <style:default-style style:family="paragraph">
      <style:text-properties fo:font-size="12pt"/>
    </style:default-style>
    <style:style style:name="Standard" style:family="paragraph" style:class="text"/>
  </office:styles>
  <office:automatic-styles>
    <style:page-layout style:name="pm1">
      <style:page-layout-properties fo:page-width="21cm" fo:page-height="29.7cm" fo:margin-top="2cm" fo:margin-bottom="2cm" fo:margin-left="2cm" fo:margin-right="2cm"/>
    </style:page-layout>
  </office:automatic-styles>
  <office:master-styles>
    <style:master-page style:name="Standard" style:page-layout-name="pm1"/>
  </office:master-styles>
</office:document-styles>
"#
        )
    }

    /// Default meta.xml stamped with the generator and creation time.
    pub fn meta_xml(generator: &str, office_version: &str) -> String {
        let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();
        let generator = crate::common::xml::escape_text(generator);
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-meta xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
    xmlns:xlink="http://www.w3.org/1999/xlink"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:meta="urn:oasis:names:tc:opendocument:xmlns:meta:1.0"
    office:version="{office_version}">
  <office:meta>
    <meta:generator>{generator}</meta:generator>
    <meta:creation-date>{now}</meta:creation-date>
    <dc:date>{now}</dc:date>
  </office:meta>
</office:document-meta>
"#
        )
    }

    /// Default settings.xml
    pub fn settings_xml(office_version: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-settings xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
    xmlns:config="urn:oasis:names:tc:opendocument:xmlns:config:1.0"
    office:version="{office_version}">
  <office:settings>
    <config:config-item-set config:name="ooo:view-settings">
      <config:config-item config:name="ViewAreaTop" config:type="long">0</config:config-item>
      <config:config-item config:name="ViewAreaLeft" config:type="long">0</config:config-item>
    </config:config-item-set>
  </office:settings>
</office:document-settings>
"#
        )
    }
}
