fn main() -> anyhow::Result<()> {
    rollout_reader::cli::run()
}
