use drupal_rest::prelude::*;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Renders `page`. `signed_in` is the client's own verdict under its
/// configured predicate.
fn render(page: &Page, session: &Session, signed_in: bool) -> Vec<String> {
    let mut out = Vec::new();
    match page {
        Page::Login { session } => {
            out.push(format!(
                "session: token={} sessid={} name={}",
                session.token.as_deref().unwrap_or("-"),
                session.sessid.as_deref().unwrap_or("-"),
                session.session_name.as_deref().unwrap_or("-"),
            ));
        }
        Page::NodeList { page, nodes } => {
            out.push(format!("nodes, page {page}"));
            if nodes.is_empty() {
                out.push("  (none)".into());
            }
            for node in nodes {
                out.push(format!("  {:>5}  {}", node.nid, node.title));
            }
        }
        Page::NodeAdd { author } => match author {
            Some(uid) => out.push(format!("new article by user {uid}")),
            None => out.push("log in to add content".into()),
        },
        Page::Node { node, image_url } => {
            out.push(format!("#{} {}", node.nid, node.title));
            if let Some(body) = node.body_value() {
                out.push(body.to_string());
            }
            if let Some(url) = image_url {
                out.push(format!("image: {url}"));
            }
        }
        Page::User(user) => {
            out.push(format!(
                "{} <{}>",
                user.name.as_deref().unwrap_or("?"),
                user.mail.as_deref().unwrap_or("-"),
            ));
            out.push(format!(
                "roles: {}",
                user.roles.values().cloned().collect::<Vec<_>>().join(", ")
            ));
        }
    }

    let who = match session.user.as_ref().and_then(|u| u.name.as_deref()) {
        Some(name) if signed_in => name,
        _ => "anonymous",
    };
    out.push(format!("-- signed in as {who}"));
    out
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let client = DrupalClient::builder()
        .config(ClientConfig::from_env()?)
        .start()
        .await?;

    if let (Ok(user), Ok(pass)) = (
        std::env::var("DRUPAL_USERNAME"),
        std::env::var("DRUPAL_PASSWORD"),
    ) {
        if !client.is_authenticated() && !client.login(&user, &pass).await {
            tracing::warn!(%user, "login failed, continuing anonymously");
        }
    }

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".into());
    let route = Route::parse(&path);
    let page = client.open(route).await?;
    let lines = render(&page, &client.session().snapshot(), client.is_authenticated());
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
