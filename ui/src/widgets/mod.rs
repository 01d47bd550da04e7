pub mod file_list;
pub mod page;
pub mod status;
pub mod upload_form;

pub use file_list::file_list;
pub use page::{PageAction, files_page};
pub use status::status_message;
pub use upload_form::upload_form;
