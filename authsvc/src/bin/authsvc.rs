use authsvc::{
    application::Application,
    configuration::Configuration,
    telemetry::{get_subscriber, init_subscriber},
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let subscriber = get_subscriber("authsvc", "info", std::io::stdout);
    init_subscriber(subscriber)?;

    let configuration = Configuration::parse("authsvc")?;
    let application = Application::build(configuration).await?;
    application.serve().await?;
    Ok(())
}
