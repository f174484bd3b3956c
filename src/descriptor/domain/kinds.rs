//! Enumerated descriptor fields.
//!
//! Each enum has a fixed set of wire values. Parsing is exact: the platform
//! treats these values case-sensitively, so `Starter` is rejected just like
//! `ultra`.

use crate::descriptor::error::UnknownVariantError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! descriptor_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $kind:literal {
            $( $(#[$variant_meta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire value, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($wire),+];

            /// Returns the canonical wire representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = UnknownVariantError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                match value {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(UnknownVariantError::new($kind, value, Self::VALUES)),
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariantError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::try_from(value)
            }
        }
    };
}

descriptor_enum! {
    /// Kind of deployable unit.
    pub enum ServiceType as "service type" {
        /// Publicly routed HTTP service.
        Web => "web",
        /// Background worker with no inbound traffic.
        Worker => "worker",
        /// Private service reachable only inside the account network.
        PrivateService => "pserv",
        /// Scheduled job.
        Cron => "cron",
    }
}

impl ServiceType {
    /// Returns whether the platform probes this service type over HTTP.
    #[must_use]
    pub const fn supports_health_check(self) -> bool {
        matches!(self, Self::Web)
    }

    /// Returns whether `plan` may be selected for this service type.
    ///
    /// The free tier is only offered for web services.
    #[must_use]
    pub const fn supports_plan(self, plan: Plan) -> bool {
        !matches!(plan, Plan::Free) || matches!(self, Self::Web)
    }
}

descriptor_enum! {
    /// Language runtime or packaging used to build the service.
    pub enum Runtime as "runtime" {
        /// Node.js.
        Node => "node",
        /// Python.
        Python => "python",
        /// Go.
        Go => "go",
        /// Rust.
        Rust => "rust",
        /// Ruby.
        Ruby => "ruby",
        /// Elixir.
        Elixir => "elixir",
        /// Built from a Dockerfile in the repository.
        Docker => "docker",
        /// Pulled as a prebuilt container image.
        Image => "image",
        /// Static files served from a CDN.
        Static => "static",
    }
}

impl Runtime {
    /// Returns whether the platform runs build and start commands for this
    /// runtime.
    ///
    /// Container runtimes take their commands from the image instead.
    #[must_use]
    pub const fn uses_commands(self) -> bool {
        !matches!(self, Self::Docker | Self::Image)
    }
}

descriptor_enum! {
    /// Compute tier allocated by the platform.
    pub enum Plan as "plan" {
        /// Shared, sleeps when idle.
        Free => "free",
        /// Smallest paid instance.
        Starter => "starter",
        /// General-purpose instance.
        Standard => "standard",
        /// High-memory instance.
        Pro => "pro",
        /// Largest instance.
        Plus => "plus",
    }
}

descriptor_enum! {
    /// Data-center location where the service runs.
    pub enum Region as "region" {
        /// US West.
        Oregon => "oregon",
        /// EU Central.
        Frankfurt => "frankfurt",
        /// US East.
        Ohio => "ohio",
        /// Asia Pacific.
        Singapore => "singapore",
    }
}

descriptor_enum! {
    /// Database attribute that can be injected into an environment variable.
    pub enum DatabaseProperty as "database property" {
        /// Full connection URL.
        ConnectionString => "connectionString",
        /// Hostname.
        Host => "host",
        /// TCP port.
        Port => "port",
        /// Login role.
        User => "user",
        /// Login password.
        Password => "password",
        /// Database name.
        Database => "database",
    }
}
