pub mod alert;
pub mod badge;
pub mod button;
pub mod card;
pub mod chart;
pub mod data_table;
pub mod input;
pub mod page_header;
pub mod skeleton;

pub use alert::*;
pub use badge::*;
pub use button::*;
pub use card::*;
pub use chart::*;
pub use data_table::*;
pub use input::*;
pub use page_header::*;
pub use skeleton::*;
