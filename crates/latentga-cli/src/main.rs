mod command;
mod fitness;
mod schema;
mod tui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
