use std::{error::Error, io};

use blog_desk::{
    api::BlogsClient,
    app::{App, Event, HELP},
    config::{Command, Config},
    controller::{CreateController, ListController},
    route::Route,
    view::{Field, NewPostForm, TerminalView, View},
};
use log::info;
use tokio::io::BufReader;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();
    info!("Using {}", config.api());

    let client = BlogsClient::new(&config)?;
    let mut app = App::new(client.clone(), TerminalView::new(io::stdout()), config.sort());

    match config.command() {
        Command::Browse => {
            app.view_mut().message(HELP)?;
            app.open(Route::Index).await?;
            app.run(BufReader::new(tokio::io::stdin())).await?;
        }
        Command::List { page, search } => {
            let mut list = ListController::new(client, config.sort()).with_search(&search, page);
            let effects = list.load().await;
            app.apply(effects).await?;
        }
        Command::Show { id } => app.open(Route::Details(id)).await?,
        Command::New {
            title,
            author,
            content,
        } => {
            let form = NewPostForm {
                title,
                author,
                content,
            };
            let effects = CreateController::new(client).submit(&form).await;
            app.apply(effects).await?;
        }
        Command::Edit { id, title, content } => {
            app.open(Route::Edit(id)).await?;
            if let Some(title) = title {
                app.dispatch(Event::Set(Field::Title, title)).await?;
            }
            if let Some(content) = content {
                app.dispatch(Event::Set(Field::Content, content)).await?;
            }
            app.dispatch(Event::Save).await?;
        }
        Command::Delete { id } => {
            app.open(Route::Details(id)).await?;
            app.dispatch(Event::Delete).await?;
        }
    }

    Ok(())
}
