//! FILENAME: core/records/src/sample.rs
//! Bundled demonstration data set, also used as a test fixture.

use crate::record::{FlatRecord, Organization};

/// Seven records across three organizations and two divisions.
pub fn sample_records() -> Vec<FlatRecord> {
    let row = |org: Organization, division: &str, team: &str, process: &str, plant: &str| {
        FlatRecord::new(org, division)
            .with_team(team)
            .with_process(process)
            .with_plant(plant)
    };

    vec![
        row(Organization::Vj, "Production", "Upper1", "VSM1", "Plant A")
            .with_line(1.0)
            .with_job_title("TM/Staff")
            .with_measures(10.0, 8.0, 6.0),
        row(Organization::Vj, "Production", "Upper1", "VSM1", "Plant A")
            .with_line(1.0)
            .with_job_title("TL")
            .with_measures(4.0, 3.0, 2.0),
        row(Organization::Vj, "Production", "Upper1", "VSM1", "Plant A")
            .with_line(2.0)
            .with_job_title("GL")
            .with_measures(2.0, 2.0, 1.0),
        row(Organization::Vj, "Production", "Upper2", "VSM2", "Plant B")
            .with_line(1.0)
            .with_job_title("MGL")
            .with_measures(3.0, 2.0, 2.0),
        row(Organization::Vj, "Production", "Upper2", "VSM2", "Plant B")
            .with_line(2.0)
            .with_job_title("VSM")
            .with_measures(5.0, 4.0, 3.0),
        row(Organization::Jj, "Production", "Upper1", "VSM1", "Plant C")
            .with_line(1.0)
            .with_job_title("TM/Staff")
            .with_measures(6.0, 5.0, 4.0),
        row(Organization::Qd, "Quality", "UpperQ", "VSM-Q", "Plant D")
            .with_line(1.0)
            .with_job_title("TL")
            .with_measures(7.0, 6.0, 5.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_covers_every_organization() {
        let records = sample_records();
        assert_eq!(records.len(), 7);
        for org in Organization::ALL {
            assert!(records.iter().any(|r| r.organization == org));
        }
    }
}
