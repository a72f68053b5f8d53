use crate::{
    Res,
    ads::decode_rows,
    cli::{Output, credential_store, report_decode_failures, search, session, spinner},
    types::{AccountTableRow, CustomerClient, CustomerClientRow},
    utils::{resource_id, truncate},
    warning,
};

const CUSTOMER_CLIENT_QUERY: &str = "SELECT customer_client.id, customer_client.descriptive_name, \
     customer_client.currency_code, customer_client.time_zone, \
     customer_client.manager, customer_client.level, customer_client.hidden, \
     customer_client.test_account \
     FROM customer_client \
     WHERE customer_client.level <= 1 \
     ORDER BY customer_client.id";

/// Lists the customer accounts reachable with the stored credentials.
///
/// With a manager account configured the `customer_client` view is queried
/// for names and currencies; otherwise, or when that query fails, only the
/// accessible resource names are shown.
pub async fn list(output: Output) -> Res<()> {
    let client = session().await?;

    let pb = spinner("Fetching accessible accounts...");
    let result = client.list_accessible_customers().await;
    pb.finish_and_clear();
    let resource_names = result?;

    let manager = credential_store().load().await?.manager_customer_id;
    if manager.is_empty() {
        return print_resource_names(output, &resource_names, false);
    }

    let rows = match search(&client, &manager, CUSTOMER_CLIENT_QUERY).await {
        Ok(rows) => rows,
        Err(e) => {
            warning!("Could not query client accounts under {}: {}", manager, e);
            return print_resource_names(output, &resource_names, true);
        }
    };

    let decoded = decode_rows::<CustomerClientRow>(rows);
    report_decode_failures(&decoded);
    let accounts: Vec<CustomerClient> = decoded
        .rows
        .into_iter()
        .map(|row| row.customer_client)
        .collect();

    output.render(&accounts, "No client accounts found under MCC.", |a| {
        AccountTableRow {
            id: a.id.clone(),
            name: truncate(&a.descriptive_name, 40),
            currency: a.currency_code.clone(),
            time_zone: truncate(&a.time_zone, 30),
            manager: yes_or_blank(a.manager),
            test: yes_or_blank(a.test_account),
        }
    })
}

fn print_resource_names(output: Output, names: &[String], degraded: bool) -> Res<()> {
    if output.is_json() {
        return output.print_json(names);
    }
    if names.is_empty() {
        println!("No accessible accounts found.");
        return Ok(());
    }

    println!("Accessible accounts ({}):", names.len());
    for name in names {
        if degraded {
            println!("  {}  (configure a manager account for full details)", resource_id(name));
        } else {
            println!("  {}", resource_id(name));
        }
    }
    Ok(())
}

fn yes_or_blank(flag: bool) -> String {
    if flag { "yes".to_string() } else { String::new() }
}
