//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation, persistence and document rendering so
//! route handlers can stay focused on protocol translation.

pub mod attendance;
pub mod catalog;
pub mod export;
pub mod memory;
pub mod postgres;
pub mod validation;

#[cfg(test)]
pub mod test_helpers {
    use signature::artifact::{self, SignatureArtifact};
    use signature::geom::Point;
    use signature::raster::RasterBuffer;
    use time::OffsetDateTime;

    use super::attendance::{Attendance, NewAttendance};

    /// A real captured signature: one short stroke on a 300×150 pad.
    #[must_use]
    pub fn sample_signature() -> SignatureArtifact {
        let mut raster = RasterBuffer::new(300, 150).expect("raster");
        raster.stroke_segment(Point::new(40.0, 60.0), Point::new(120.0, 90.0));
        artifact::capture(&raster).expect("capture")
    }

    /// A valid submission for `name`.
    #[must_use]
    pub fn new_attendance(name: &str) -> NewAttendance {
        NewAttendance {
            name: name.to_owned(),
            nip: "198703122010011002".into(),
            position: "Kepala Seksi".into(),
            institution: "Dinas PUPR".into(),
            region: "Kab. Bangka".into(),
            department: "Bina Marga".into(),
            signature: sample_signature(),
        }
    }

    /// A stored record for `name` created at `created_at`.
    #[must_use]
    pub fn stored_attendance(name: &str, created_at: OffsetDateTime) -> Attendance {
        Attendance::from_new(new_attendance(name), created_at)
    }
}
