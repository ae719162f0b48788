use cmdtab::prelude::*;
use cmdtab::{
    ArgumentDecl, CommandDecl, CommandTable, Kind, OptionDecl, Params, Signature, Value,
};

#[derive(Default)]
struct Installer {
    params: Params,
}

impl Installer {
    fn verbose(&self) -> bool {
        self.params
            .get("verbose")
            .and_then(Value::as_bool)
            .unwrap_or_default()
    }
}

impl Dispatch for Installer {
    type Output = ();

    fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    fn signature(&self, command: &str) -> Option<Signature> {
        match command {
            "install" => Some(Signature::new(1).rest()),
            "remove" => Some(Signature::new(1)),
            _ => None,
        }
    }

    fn call(&mut self, command: &str, args: Vec<Value>) {
        for package in args {
            if self.verbose() {
                println!("{command}: {package} ({:?})", self.params.get("mode"));
            } else {
                println!("{command}: {package}");
            }
        }
    }
}

fn main() {
    let cli = CommandTable::new("installer")
        .global(
            OptionDecl::new("verbose")
                .description("Print every step.")
                .default(false)
                .use_no(),
        )
        .command(
            CommandDecl::new("install")
                .description("Install one or more packages.")
                .argument(ArgumentDecl::new("packages").splat().required())
                .option(
                    OptionDecl::new("mode")
                        .description("How to fetch the packages.")
                        .allowed(["fast", "safe"])
                        .default("safe"),
                )
                .option(OptionDecl::new("env").kind(Kind::Hash)),
        )
        .command(
            CommandDecl::new("remove")
                .description("Remove a package.")
                .argument(ArgumentDecl::new("package")),
        )
        .build();

    cli.run(&mut Installer::default());
}
