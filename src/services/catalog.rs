//! Fixed option lists offered by the form's region and department selects.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use serde::Serialize;

pub const REGIONS: &[&str] = &[
    "Prov. Kep. Bangka Belitung",
    "Kota Pangkalpinang",
    "Kab. Bangka",
    "Kab. Belitung",
    "Kab. Bangka Selatan",
    "Kab. Bangka Tengah",
    "Kab. Bangka Barat",
    "Kab. Belitung Timur",
];

pub const DEPARTMENTS: &[&str] = &[
    "Sumber Daya Air",
    "Cipta Karya, Perumahan, & Permukiman",
    "Bina Marga",
    "Jasa Konstruksi",
    "Tata Ruang & Pertanahan",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOptions {
    pub regions: &'static [&'static str],
    pub departments: &'static [&'static str],
}

#[must_use]
pub fn options() -> FormOptions {
    FormOptions { regions: REGIONS, departments: DEPARTMENTS }
}

#[must_use]
pub fn is_region(value: &str) -> bool {
    REGIONS.contains(&value)
}

#[must_use]
pub fn is_department(value: &str) -> bool {
    DEPARTMENTS.contains(&value)
}
