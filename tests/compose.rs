use docker_compose_types::{Compose, Environment, Ports, Volumes};
use n8n_provision::App;
use n8n_provision::compose;

fn parse(yaml: &str) -> Compose {
    serde_yaml::from_str(yaml).expect("rendered compose is not valid YAML")
}

#[test]
fn generates_valid_compose() {
    let app = App::n8n("n8n.example.com");

    let result = compose::render(&app).expect("render failed");

    assert!(result.contains("services:"));
    assert!(result.contains("image: docker.n8n.io/n8nio/n8n"));
    assert!(result.contains("container_name: n8n"));
    assert!(result.contains("restart: unless-stopped"));
    assert!(result.contains("127.0.0.1:5678:5678"));
    assert!(result.contains("/opt/n8n/data:/home/node/.n8n"));
}

#[test]
fn environment_binds_public_url() {
    let app = App::n8n("n8n.example.com");

    let parsed = parse(&compose::render(&app).expect("render failed"));
    let service = parsed.services.0.get("n8n").and_then(Option::as_ref).expect("service missing");

    let Environment::List(env) = &service.environment else {
        panic!("expected list environment");
    };
    assert!(env.contains(&"N8N_HOST=n8n.example.com".to_string()));
    assert!(env.contains(&"N8N_PROTOCOL=https".to_string()));
    assert!(env.contains(&"WEBHOOK_URL=https://n8n.example.com/".to_string()));
    assert!(env.contains(&"N8N_EDITOR_BASE_URL=https://n8n.example.com/".to_string()));
}

#[test]
fn single_service_with_fixed_port_and_mount() {
    let app = App::new("svc", "example/svc")
        .port(3000)
        .bind_address("0.0.0.0")
        .base_dir("/srv/svc")
        .container_data_path("/data");

    let parsed = parse(&compose::render(&app).expect("render failed"));

    assert_eq!(parsed.services.0.len(), 1);
    let service = parsed.services.0.get("svc").and_then(Option::as_ref).expect("service missing");
    assert_eq!(service.image.as_deref(), Some("example/svc"));
    assert_eq!(service.container_name.as_deref(), Some("svc"));
    assert!(matches!(
        &service.ports,
        Ports::Short(p) if p == &vec!["0.0.0.0:3000:3000".to_string()]
    ));
    assert!(matches!(
        service.volumes.as_slice(),
        [Volumes::Simple(v)] if v == "/srv/svc/data:/data"
    ));
}
