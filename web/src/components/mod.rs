pub mod feedback;
pub mod fields;
pub mod header;
pub mod layout;
pub mod pagination;
pub mod table_view;
