fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    flow_studio::run_app()
}
