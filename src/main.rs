use tracing::{error, Level};

use yapperps::{
    configuration::{get_configuration, set_configuration, AppState, State},
    error::Error,
    handler::roster_refresher,
    server,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match init() {
        Ok(config) => config,
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    let state = State::new(config)?;
    let app_state = AppState::new(state);

    let (_, _) = tokio::try_join!(
        server::server_task(&app_state),
        roster_refresher(app_state.clone()),
    )?;

    Ok(())
}

fn init() -> Result<yapperps::configuration::Config, Error> {
    set_configuration()?;
    get_configuration()
}
