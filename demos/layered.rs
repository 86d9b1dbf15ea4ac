use std::time::Duration;

use dragon_cli::cli::{self, exit_on_error, logging, Command, FlagSpec};
use dragon_cli::config::Options;
use dragon_cli::flag::extensions::{ByteSize, CountValue};
use dragon_cli::{build_info, Error, Registry};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Server {
    host: String,
    port: u16,
}

#[derive(Clone)]
struct Greeter {
    greeting: String,
}

fn defaults(config: &mut Registry) {
    config.set_default("server.host", "127.0.0.1");
    config.set_default("server.port", 8080);
}

fn main() {
    // CONFIG_DIR points at the config tree, CONFIG_ENV selects the overlay
    let config = exit_on_error(cli::config(|opts: Options| opts, &[&defaults]));
    exit_on_error(logging::init_from_config(&config));

    let app = Command::new("layered")
        .about("Shows layered configuration in action")
        .with_auto_version(build_info!())
        .with_config(config)
        .with_dependency(Greeter {
            greeting: "hello".to_string(),
        })
        .with_flag(FlagSpec::new("verbose", "verbosity", CountValue::new(0)).short('v').persistent())
        .with_subcommand(
            Command::new("serve")
                .about("Print the resolved server settings")
                .with_flag(FlagSpec::value("port", 0u16, "listen port").short('p').bind("server.port"))
                .with_flag(FlagSpec::value("timeout", Duration::from_secs(30), "request timeout").bind("server.timeout"))
                .with_flag(FlagSpec::value("max-body", ByteSize(1_000_000), "largest accepted body").bind("server.max_body"))
                .run(|ctx, flags| {
                    let server: Server = ctx
                        .config()
                        .get_as("server")?
                        .ok_or_else(|| Error::command("missing server section"))?;
                    let greeter = ctx.get_or_else(|| Greeter {
                        greeting: "hi".to_string(),
                    });
                    println!("{} from {}:{}", greeter.greeting, server.host, server.port);
                    if flags.get::<i64>("verbose").unwrap_or(0) > 0 {
                        ctx.config()
                            .dump(std::io::stdout().lock())
                            .map_err(Error::command)?;
                    }
                    Ok(())
                }),
        )
        .with_subcommand(Command::new("keys").about("List config keys").run(|ctx, _| {
            for key in ctx.config().all_keys() {
                println!("{key}");
            }
            Ok(())
        }));

    exit_on_error(app.execute());
}
