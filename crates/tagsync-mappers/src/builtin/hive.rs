//! Hive mapper: `database.table`, plus `column`.

use crate::mapper::{QualifiedNameLayout, ResourceMapper};

pub const HIVE_LAYOUT: QualifiedNameLayout = QualifiedNameLayout {
    delimiter: '.',
    levels: &["database", "table"],
    column_level: "column",
};

#[derive(Default)]
pub struct HiveMapper;

impl ResourceMapper for HiveMapper {
    fn id(&self) -> &str {
        "hive"
    }

    fn service(&self) -> &str {
        "hive"
    }

    fn layout(&self) -> &QualifiedNameLayout {
        &HIVE_LAYOUT
    }
}
