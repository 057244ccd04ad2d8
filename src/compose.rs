use docker_compose_types::{Compose, Environment, Ports, Service, Services, Volumes};
use indexmap::IndexMap;

use crate::app::App;
use crate::error::ProvisionResult;

/// Render the `docker-compose.yml` running the single application
/// container.
pub fn render(app: &App) -> ProvisionResult<String> {
    let mut services = IndexMap::new();
    services.insert(app.name.clone(), Some(app_service(app)));

    let compose = Compose {
        services: Services(services),
        ..Default::default()
    };

    Ok(serde_yaml::to_string(&compose)?)
}

fn app_service(app: &App) -> Service {
    let environment = if app.env.is_empty() {
        Environment::default()
    } else {
        Environment::List(app.env.iter().map(|(k, v)| format!("{k}={v}")).collect())
    };

    Service {
        image: Some(app.image.clone()),
        container_name: Some(app.name.clone()),
        restart: Some(app.restart.clone()),
        ports: Ports::Short(vec![format!(
            "{}:{port}:{port}",
            app.bind_address,
            port = app.port
        )]),
        environment,
        volumes: vec![Volumes::Simple(format!(
            "{}:{}",
            app.data_dir, app.container_data_path
        ))],
        ..Default::default()
    }
}
