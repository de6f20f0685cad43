use crate::exit_codes;

/// Triage points are a successful run; only failing to reach the platform is not
pub fn doctor_exit_code(fail_on_triage: bool, has_triage_points: bool) -> i32 {
    if fail_on_triage && has_triage_points {
        exit_codes::TRIAGE_POINTS_FOUND
    } else {
        exit_codes::SUCCESS
    }
}
