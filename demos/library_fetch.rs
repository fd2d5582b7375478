use std::error::Error;

use userbook::filter::filter;
use userbook::runner::{Options, Runner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(Options {
        desired_total: 120,
        max_per_request: 50,
        seed: "demo".to_string(),
        ..Options::default()
    })?;
    println!("Plan: {:?}", runner.plan());

    let result = runner.run().await?;
    println!("Fetched {} users in {:?}", result.users.len(), result.elapsed);

    for user in filter(&result.users, "an").iter().take(10) {
        println!("{} <{}>", user.full_name(), user.email);
    }

    Ok(())
}
