use easychart::error::AppResult;

fn main() -> AppResult<()> {
    easychart::run()
}
