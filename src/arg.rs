use clap::{
    App,
    Arg,
    ArgMatches,
};

pub struct Settings {
    pub repo: Option<String>,
}

impl Settings {

    pub fn new() -> Settings {
        Settings {
            repo: None,
        }
    }

    fn repo_from_args(&mut self, arg: &ArgMatches) {
        match arg.value_of("repo") {
            Some(v) => {
                self.repo = Some(v.to_string());
            },
            _ => {},
        };
    }

    pub fn from_args() -> Settings {
        let mut o = App::new("goshare");
        o = o.version(env!("CARGO_PKG_VERSION"));
        o = o.arg(
            Arg::with_name("repo")
                .long("repo")
                .short("r")
                .value_name("Repository to open before entering the shell.")
                .takes_value(true)
                );

        let arg_matches = o.get_matches();
        let mut settings = Settings::new();
        settings.repo_from_args(&arg_matches);
        settings
    }
}
