use scanner_core::analysis::Industry;

pub fn list() {
    for industry in Industry::all() {
        println!("{}", industry);
    }
}
