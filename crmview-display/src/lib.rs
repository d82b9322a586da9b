pub mod field;
pub mod link;
pub mod stages;

pub use field::{
    expand_available_fields, field_markup, filter_fields, render_field, AvailableField, DisplaySettings, FieldHtml,
    IMPLIED_FIELDS,
};
pub use link::{link_html, resolve_href, strip_href};
pub use stages::{DisplaySettingsFields, FieldHref, FieldItemHtml, FieldsHtml, LinkHtml};

pub mod prelude {
    //! Re-exports of the most commonly used display types.
    pub use crate::{AvailableField, DisplaySettings, FieldHtml};
}
