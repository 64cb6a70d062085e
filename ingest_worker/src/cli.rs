/// There's no real CLI for the worker, so keep it quick 'n dirty: positional shop URLs to kick off processing, an
/// optional trigger-records file, and a small provisioning subcommand for per-shop secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ingest { shops: Vec<String>, records_file: Option<String> },
    SetSecret { host: String, token: String },
    Help,
}

pub fn parse_args(args: impl Iterator<Item = String>) -> Command {
    let args = args.collect::<Vec<String>>();
    match args.first().map(String::as_str) {
        Some("set-secret") => match (args.get(1), args.get(2)) {
            (Some(host), Some(token)) => Command::SetSecret { host: host.clone(), token: token.clone() },
            _ => Command::Help,
        },
        Some("--help") | Some("-h") | Some("help") => Command::Help,
        _ => {
            let mut shops = Vec::new();
            let mut records_file = None;
            let mut iter = args.into_iter();
            while let Some(arg) = iter.next() {
                if arg == "--records" {
                    match iter.next() {
                        Some(path) => records_file = Some(path),
                        None => return Command::Help,
                    }
                } else {
                    shops.push(arg);
                }
            }
            Command::Ingest { shops, records_file }
        },
    }
}

pub fn print_help() {
    println!(
        "\nShopify order ingest worker\n\n\
         USAGE:\n  \
         ingest_worker [--records <file.json>] [SHOP_URL]...\n  \
         ingest_worker set-secret <host> <token>\n\n\
         Each SHOP_URL gets a processing marker and an initial continuation signal; the worker then drains the\n\
         pending order queue for every triggered shop and exits when no work remains.\n\n\
         The records file holds a JSON array of raw trigger records (notification- or change-stream-shaped).\n"
    );
    println!("Recognized environment variables (all required):");
    const ENV_VARS: [&str; 5] =
        ["SIW_DATABASE_URL", "SIW_BATCH_SIZE", "SIW_ORDER_TOPIC", "SIW_CONTINUATION_TOPIC", "SIW_SHOPIFY_API_VERSION"];
    ENV_VARS.iter().for_each(|name| println!("  {name}"));
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn shop_urls_and_records_file() {
        let command = parse(&["--records", "triggers.json", "https://shopA.example", "https://shopB.example"]);
        assert_eq!(command, Command::Ingest {
            shops: vec!["https://shopA.example".to_string(), "https://shopB.example".to_string()],
            records_file: Some("triggers.json".to_string()),
        });
    }

    #[test]
    fn no_args_means_an_idle_ingest_run() {
        assert_eq!(parse(&[]), Command::Ingest { shops: vec![], records_file: None });
    }

    #[test]
    fn set_secret_needs_both_parts() {
        let command = parse(&["set-secret", "shopA.example", "shpat_cafe"]);
        assert_eq!(command, Command::SetSecret { host: "shopA.example".to_string(), token: "shpat_cafe".to_string() });
        assert_eq!(parse(&["set-secret", "shopA.example"]), Command::Help);
    }

    #[test]
    fn dangling_records_flag_prints_help() {
        assert_eq!(parse(&["--records"]), Command::Help);
    }
}
