//! Types and traits for form processing.

mod form_items;
mod from_form;
mod from_form_value;
mod lenient;
mod error;
mod form;

pub use self::form_items::{FormItems, FormItem};
pub use self::from_form::FromForm;
pub use self::from_form_value::FromFormValue;
pub use self::form::Form;
pub use self::lenient::LenientForm;
pub use self::error::{FormError, FormParseError, FormDataError};
