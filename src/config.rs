use crate::error::*;

use std::path::{Path, PathBuf};
use std::env::var;


#[derive(Debug)]
pub struct Config {
    config_dir: Option<PathBuf>,
    template_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Self {
        let config_dir = Self::find_config_dir();
        let template_dir = Self::find_template_dir(&config_dir);

        Self {
            config_dir,
            template_dir,
        }
    }

    pub fn test_config() -> Self {
        let config_dir = Some(PathBuf::from("./"));
        let template_dir = Some(PathBuf::from("./"));

        Self {
            config_dir,
            template_dir,
        }
    }

    fn find_config_dir() -> Option<PathBuf> {
        let mut path = PathBuf::new();

        if let Ok(vagen_config_home) = var("VAGEN_CONFIG_HOME") {
            path.push(&vagen_config_home);
        } else if let Ok(xdg_config_home) = var("XDG_CONFIG_HOME") {
            if !xdg_config_home.is_empty() {
                path.push(xdg_config_home);
                path.push("vagen");
            }
        } else if let Ok(home) = var("HOME") {
            if !home.is_empty() {
                path.push(home);
                path.push(".config");
                path.push("vagen");
            }
        }

        if !path.as_os_str().is_empty() && path.exists() {
            Some(path)
        } else {
            None
        }
    }

    fn find_template_dir(config_dir: &Option<PathBuf>) -> Option<PathBuf> {
        if let Some(config_dir) = config_dir {
            let mut path = PathBuf::from(config_dir);
            path.push("templates");

            if path.exists() {
                Some(path)
            } else {
                None
            }
        } else {
            None
        }
    }


    pub fn get_template_dir(&self) -> Option<&PathBuf> {
        self.template_dir.as_ref()
    }

    pub fn get_config_dir(&self) -> Option<&PathBuf> {
        self.config_dir.as_ref()
    }

    /// Resolve a template given on the command line or in a script.
    ///
    /// An existing path wins, otherwise the name is looked up in the template directory.
    pub fn find_template(&self, name: impl AsRef<Path>) -> Result<PathBuf> {
        let name = name.as_ref();

        if name.is_file() {
            return Ok(name.to_path_buf());
        }

        self.template_dir
            .as_ref()
            .map(|dir| dir.join(name))
            .filter(|path| path.is_file())
            .ok_or_else(|| Error::TemplateNotFound(name.display().to_string()))
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use std::env::{set_var, remove_var};
    use std::fs::{create_dir, write};
    use tempdir::TempDir;


    #[test]
    fn test_config_directories() {
        const DIRNAME: &'static str = "foo";

        // test init from VAGEN_CONFIG_HOME
        {
            let tmpd = TempDir::new(DIRNAME).unwrap();
            let templated = tmpd.path().join("templates");
            create_dir(&templated).unwrap();
            set_var("VAGEN_CONFIG_HOME", tmpd.path());

            let config = Config::load();

            assert_eq!(tmpd.path(), *config.get_config_dir().unwrap());
            assert_eq!(templated, *config.get_template_dir().unwrap());

            remove_var("VAGEN_CONFIG_HOME");
        }

        // test init from XDG_CONFIG_HOME
        {
            let tmpd = TempDir::new(DIRNAME).unwrap();
            let configd = tmpd.path().join("vagen");
            let templated = configd.join("templates");
            create_dir(&configd).unwrap();
            create_dir(&templated).unwrap();
            set_var("XDG_CONFIG_HOME", tmpd.path());

            let config = Config::load();

            assert_eq!(configd, *config.get_config_dir().unwrap());
            assert_eq!(templated, *config.get_template_dir().unwrap());

            remove_var("XDG_CONFIG_HOME");
        }

        // test init from HOME
        {
            let save_home = var("HOME").ok();
            let tmpd = TempDir::new(DIRNAME).unwrap();
            let dotd = tmpd.path().join(".config");
            let configd = dotd.join("vagen");
            let templated = configd.join("templates");
            create_dir(&dotd).unwrap();
            create_dir(&configd).unwrap();
            create_dir(&templated).unwrap();
            set_var("HOME", tmpd.path());

            let config = Config::load();

            assert_eq!(configd, *config.get_config_dir().unwrap());
            assert_eq!(templated, *config.get_template_dir().unwrap());

            match save_home {
                Some(home) => set_var("HOME", home),
                None => remove_var("HOME"),
            }
        }

        // test non-existing template dir
        {
            let tmpd = TempDir::new(DIRNAME).unwrap();
            set_var("VAGEN_CONFIG_HOME", tmpd.path());

            let config = Config::load();

            assert_eq!(tmpd.path(), *config.get_config_dir().unwrap());
            assert_eq!(None, config.get_template_dir());

            remove_var("VAGEN_CONFIG_HOME");
        }

        // test non-existing config dir
        {
            let tmpd = TempDir::new(DIRNAME).unwrap();
            let configd = tmpd.path().join("vagen_config");
            set_var("VAGEN_CONFIG_HOME", configd);

            let config = Config::load();

            assert_eq!(None, config.get_config_dir());
            assert_eq!(None, config.get_template_dir());

            remove_var("VAGEN_CONFIG_HOME");
        }

        // test template lookup by name
        {
            let tmpd = TempDir::new(DIRNAME).unwrap();
            let templated = tmpd.path().join("templates");
            create_dir(&templated).unwrap();
            write(templated.join("pulse.va"), "$TEMPLATE_MODULE_NAME").unwrap();
            set_var("VAGEN_CONFIG_HOME", tmpd.path());

            let config = Config::load();

            assert_eq!(templated.join("pulse.va"), config.find_template("pulse.va").unwrap());
            assert!(matches!(config.find_template("other.va"), Err(Error::TemplateNotFound(_))));

            remove_var("VAGEN_CONFIG_HOME");
        }
    }
}
