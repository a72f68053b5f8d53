use crate::{
    Res,
    cli::{Output, search, session},
};

/// Runs a raw GAQL query and prints the rows as JSON, untouched.
pub async fn run(output: Output, account: &str, query: &str) -> Res<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err("query must not be empty".into());
    }

    let client = session().await?;
    let rows = search(&client, account, query).await?;
    output.print_json(&rows)
}
