/// Format whole minutes since midnight as `HH:MM:00`.
pub fn minutes_to_clock_string(minutes: u32) -> String {
    let h = minutes / 60;
    let m = minutes % 60;
    format!("{h:02}:{m:02}:00")
}
