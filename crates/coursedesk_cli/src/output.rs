const ACTIVE_CHAR: &str = "*";

pub fn success(msg: &str) {
    println!("[SUCCESS] {}", msg)
}

pub fn info(msg: &str) {
    println!("[INFO] {}", msg)
}

pub fn error(msg: &str) {
    eprintln!("[ERROR] {}", msg);
}

/// Prints one row per item, marking rows for which `marked` holds.
pub fn item_table<F>(rows: Vec<String>, marked: F)
where
    F: Fn(usize) -> bool,
{
    for (i, row) in rows.iter().enumerate() {
        let marker = if marked(i) {
            ACTIVE_CHAR.to_owned()
        } else {
            " ".repeat(ACTIVE_CHAR.len())
        };
        println!("{} {}", marker, row);
    }
}
