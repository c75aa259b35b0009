//! Blog API Example
//!
//! Posts with an author (embedded by default) and comments (on request),
//! plus users whose `recent_posts` include is camel-cased for the transformer.
//!
//! ```text
//! cargo run --example blog
//! curl 'http://127.0.0.1:3000/posts?include=comments.author&limit=2'
//! ```

use skeleton::prelude::*;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,skeleton=debug")),
        )
        .init();

    let config = ApiConfig::from_yaml_str(include_str!("api.yaml"))?;

    let users = InMemoryStore::new().with_fields(["name", "email"]);
    let posts = InMemoryStore::new().with_fields(["title", "slug"]);
    populate_test_data(&users, &posts)?;

    let user_transformer: Arc<dyn Transformer<Record>> =
        Arc::new(RecordTransformer::new(["id", "name"]));
    let comment_transformer: Arc<dyn Transformer<Record>> = Arc::new(
        RecordTransformer::new(["id", "body"]).with_relation("author", user_transformer.clone(), false),
    );
    let post_transformer = RecordTransformer::new(["id", "title", "slug", "body"])
        .with_relation("author", user_transformer.clone(), true)
        .with_keyed_relation("comments", "comments", comment_transformer, false);

    let post_rules = StaticRules {
        create: Rules::new()
            .field("title", [Rule::Required, Rule::String, Rule::Max(120.0)])
            .field("slug", [Rule::Required, Rule::Pattern(regex::Regex::new("^[a-z0-9-]+$")?)])
            .field("body", [Rule::String]),
        update: Rules::new()
            .field("title", [Rule::String, Rule::Max(120.0)])
            .field("slug", [Rule::Pattern(regex::Regex::new("^[a-z0-9-]+$")?)]),
    };

    let user_rules = StaticRules::same(
        Rules::new()
            .field("name", [Rule::Required, Rule::String])
            .field("email", [Rule::Email]),
    );

    let posts_controller = ResourceController::new(
        resource(&config, "posts")?,
        Arc::new(posts),
        post_transformer,
    )
    .with_rules(post_rules);

    let users_controller = ResourceController::new(
        resource(&config, "users")?,
        Arc::new(users),
        RecordTransformer::new(["id", "name", "email"]).with_relation(
            "recentPosts",
            Arc::new(RecordTransformer::new(["id", "title"])),
            false,
        ),
    )
    .with_rules(user_rules);

    println!("🚀 Starting blog API");
    println!("\n🌐 Server running on http://127.0.0.1:3000");
    println!("\n  🔷 Resource Routes (posts, users):");
    println!("    GET    /{{name}}              - List (skip, limit, include)");
    println!("    POST   /{{name}}              - Create");
    println!("    GET    /{{name}}/{{id}}         - Fetch (include, use_as_id)");
    println!("    PUT    /{{name}}/{{id}}         - Update");
    println!("    DELETE /{{name}}/{{id}}         - Delete");

    ServerBuilder::new()
        .with_config(config)
        .with_cors(CorsLayer::permissive())
        .register(posts_controller)
        .register(users_controller)
        .serve("127.0.0.1:3000")
        .await
}

fn resource(config: &ApiConfig, name: &str) -> Result<ResourceConfig> {
    config
        .resource(name)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("resource '{}' missing from api.yaml", name))
}

fn populate_test_data(users: &InMemoryStore, posts: &InMemoryStore) -> Result<()> {
    let ada = users.insert(
        Record::new()
            .with_attribute("name", json!("Ada Lovelace"))
            .with_attribute("email", json!("ada@example.com")),
    )?;
    let grace = users.insert(
        Record::new()
            .with_attribute("name", json!("Grace Hopper"))
            .with_attribute("email", json!("grace@example.com")),
    )?;

    let mut written = Vec::new();
    for n in 1..=12 {
        let author = if n % 2 == 0 { &ada } else { &grace };
        let post = posts.insert(
            Record::new()
                .with_attribute("title", json!(format!("Notes, part {n}")))
                .with_attribute("slug", json!(format!("notes-part-{n}")))
                .with_attribute("body", json!("..."))
                .with_one("author", author.clone())
                .with_many(
                    "comments",
                    vec![
                        Record::new()
                            .with_id(n)
                            .with_attribute("body", json!("Great read"))
                            .with_one("author", if n % 2 == 0 { grace.clone() } else { ada.clone() }),
                    ],
                ),
        )?;
        if n % 2 == 0 {
            written.push(post);
        }
    }

    users.insert(ada.with_many("recentPosts", written))?;
    Ok(())
}
