use blogicum_models::{CONFIG, ITEMS_PER_PAGE};
use rocket::{http::RawStr, request::FromFormValue, response::NamedFile};
use std::path::{Path, PathBuf};

pub mod comments;
pub mod errors;
pub mod posts;
pub mod session;
pub mod user;

#[derive(Shrinkwrap, Copy, Clone, UriDisplayQuery)]
pub struct Page(i32);

impl<'v> FromFormValue<'v> for Page {
    type Error = &'v RawStr;

    fn from_form_value(form_value: &'v RawStr) -> Result<Page, &'v RawStr> {
        match form_value.parse::<i32>() {
            Ok(page) if page > 0 => Ok(Page(page)),
            _ => Err(form_value),
        }
    }
}

impl Page {
    /// Computes the total number of pages needed to display n_items
    pub fn total(n_items: i32) -> i32 {
        if n_items % ITEMS_PER_PAGE == 0 {
            n_items / ITEMS_PER_PAGE
        } else {
            (n_items / ITEMS_PER_PAGE) + 1
        }
    }

    /// Saturates instead of overflowing, so an absurd `?page=` value
    /// yields an empty page rather than a panic or a negative offset.
    pub fn limits(self) -> (i32, i32) {
        let min = (self.0 - 1).saturating_mul(ITEMS_PER_PAGE);
        (min, min.saturating_add(ITEMS_PER_PAGE))
    }
}

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

#[get("/static/<file..>", rank = 2)]
pub fn static_files(file: PathBuf) -> Option<NamedFile> {
    NamedFile::open(Path::new("static/").join(file)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_start_at_one() {
        assert!(Page::from_form_value(RawStr::from_str("1")).is_ok());
        assert!(Page::from_form_value(RawStr::from_str("0")).is_err());
        assert!(Page::from_form_value(RawStr::from_str("-3")).is_err());
        assert!(Page::from_form_value(RawStr::from_str("nope")).is_err());
    }

    #[test]
    fn limits_do_not_overflow() {
        let page = Page::from_form_value(RawStr::from_str("2147483647")).expect("test: page");
        let (min, max) = page.limits();
        assert!(min > 0);
        assert!(max >= min);
    }
}

#[get("/media/<file..>")]
pub fn media_files(file: PathBuf) -> Option<NamedFile> {
    NamedFile::open(Path::new(&CONFIG.media_directory).join(file)).ok()
}
