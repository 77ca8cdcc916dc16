use std::error::Error;

use bloom_content::{
    api::DatoClient,
    config::{Command, Config},
    post::{display_posts, export::export_posts, Blog},
    unit,
};
use log::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();

    let client = DatoClient::new(&config)?;
    match config.command.clone() {
        Command::Raw => {
            let value = client.fetch_raw_json().await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::List => {
            let blog = Blog::new(client);
            let posts = unit!("Loading posts", blog.fetch_published_posts().await);
            display_posts(&posts);
        }
        Command::Show { slug, format } => {
            let blog = Blog::new(client);
            let post = unit!("Loading post", blog.fetch_post_by_slug(&slug).await);
            let Some(post) = post else {
                return Err(format!("no published post with slug {:?}", slug).into());
            };
            info!("{} ({})", post.title, post.path());
            println!("{}", post.render(format));
        }
        Command::Export { output, format } => {
            info!("# Blog Export #");
            info!("");
            let blog = Blog::new(client);
            let posts = unit!("Loading posts", blog.fetch_published_posts().await);
            display_posts(&posts);

            unit!(
                format!("Exporting {} to {}", format, output.display()),
                export_posts(&posts, &output, format).await?
            );
        }
    }

    info!("All done!");
    Ok(())
}
