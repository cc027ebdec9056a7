//! EPS Session Management (ESM) Messages
//!
//! 3GPP TS 24.301 Section 8.3. The EPS bearer identity and PTI are header
//! fields and live in [`crate::messages::EsmMessage`]; the types here hold
//! the IEs after the message type octet.
//!
//! - Activate default / dedicated EPS bearer context (request, accept, reject)
//! - Modify EPS bearer context (request, accept, reject)
//! - Deactivate EPS bearer context (request, accept)
//! - PDN connectivity and PDN disconnect (request, reject)
//! - Bearer resource allocation and modification (request, reject)
//! - ESM information (request, response)
//! - ESM status

/// IEI values shared by the ESM messages
pub mod esm_common_iei {
    /// Protocol configuration options
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x27;
    /// T3396 value (back-off timer)
    pub const BACK_OFF_TIMER: u8 = 0x37;
    /// Re-attempt indicator
    pub const RE_ATTEMPT_INDICATOR: u8 = 0x6B;
    /// Extended protocol configuration options
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x7B;
}

/// Presence mask bits of the messages that carry only configuration options
pub mod pco_message_presence {
    #![allow(missing_docs)]
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 0;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 1;
}

/// Presence mask bits of the rejects that carry a back-off timer
pub mod back_off_reject_presence {
    #![allow(missing_docs)]
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 0;
    pub const BACK_OFF_TIMER: u32 = 1 << 1;
    pub const RE_ATTEMPT_INDICATOR: u32 = 1 << 2;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 3;
}

/// Implements a message made of an optional ESM cause prefix and the
/// PCO / extended PCO pair.
///
/// `pco_message!(Name, Kind, "label")` has no mandatory IE;
/// `pco_message!(cause Name, Kind, "label")` starts with an ESM cause.
macro_rules! pco_message {
    ($(#[$doc:meta])* $name:ident, $kind:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name {
            /// Protocol configuration options (TLV, IEI 0x27)
            pub protocol_configuration_options:
                Option<$crate::ies::ProtocolConfigurationOptions>,
            /// Extended protocol configuration options (TLV-E, IEI 0x7B)
            pub extended_protocol_configuration_options:
                Option<$crate::ies::ExtendedProtocolConfigurationOptions>,
        }

        impl $crate::messages::EsmMessageBody for $name {
            const MESSAGE_TYPE: $crate::enums::EsmMessageType =
                $crate::enums::EsmMessageType::$kind;
            const NAME: &'static str = $label;

            fn decode_body<B: ::bytes::Buf>(buf: &mut B) -> $crate::codec::NasResult<Self> {
                let mut msg = Self::default();
                pco_message!(@walk msg, buf);
                Ok(msg)
            }

            fn encode_body<B: ::bytes::BufMut>(&self, buf: &mut B) -> $crate::codec::NasResult<()> {
                pco_message!(@encode self, buf)
            }

            fn presence_mask(&self) -> u32 {
                pco_message!(@mask self)
            }
        }
    };
    ($(#[$doc:meta])* cause $name:ident, $kind:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            /// ESM cause (mandatory, V)
            pub esm_cause: $crate::enums::EsmCause,
            /// Protocol configuration options (TLV, IEI 0x27)
            pub protocol_configuration_options:
                Option<$crate::ies::ProtocolConfigurationOptions>,
            /// Extended protocol configuration options (TLV-E, IEI 0x7B)
            pub extended_protocol_configuration_options:
                Option<$crate::ies::ExtendedProtocolConfigurationOptions>,
        }

        impl $name {
            /// Create a message carrying only the cause
            pub fn new(esm_cause: $crate::enums::EsmCause) -> Self {
                Self {
                    esm_cause,
                    protocol_configuration_options: None,
                    extended_protocol_configuration_options: None,
                }
            }
        }

        impl $crate::messages::EsmMessageBody for $name {
            const MESSAGE_TYPE: $crate::enums::EsmMessageType =
                $crate::enums::EsmMessageType::$kind;
            const NAME: &'static str = $label;

            fn decode_body<B: ::bytes::Buf>(buf: &mut B) -> $crate::codec::NasResult<Self> {
                use $crate::codec::NasDecode;

                $crate::codec::check_mandatory_length(buf, 1)?;
                let mut msg = Self::new($crate::enums::EsmCause::nas_decode(buf)?);
                pco_message!(@walk msg, buf);
                Ok(msg)
            }

            fn encode_body<B: ::bytes::BufMut>(&self, buf: &mut B) -> $crate::codec::NasResult<()> {
                use $crate::codec::NasEncode;

                self.esm_cause.nas_encode(buf)?;
                pco_message!(@encode self, buf)
            }

            fn presence_mask(&self) -> u32 {
                pco_message!(@mask self)
            }
        }
    };
    (@walk $msg:ident, $buf:ident) => {{
        use $crate::codec::NasDecode;
        use $crate::messages::esm::esm_common_iei as iei;

        while let Some((raw, key)) = $crate::messages::next_iei($buf) {
            match key {
                iei::PROTOCOL_CONFIGURATION_OPTIONS => {
                    $crate::messages::keep_first(
                        &mut $msg.protocol_configuration_options,
                        Self::NAME,
                        raw,
                        $crate::ies::ProtocolConfigurationOptions::nas_decode($buf)?,
                    )
                }
                iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS => {
                    $crate::messages::keep_first(
                        &mut $msg.extended_protocol_configuration_options,
                        Self::NAME,
                        raw,
                        $crate::ies::ExtendedProtocolConfigurationOptions::nas_decode($buf)?,
                    )
                }
                _ => return Err($crate::messages::unexpected_iei(Self::NAME, raw)),
            }
        }
    }};
    (@encode $self:ident, $buf:ident) => {{
        use $crate::messages::esm::esm_common_iei as iei;

        $crate::codec::encode_optional(
            $buf,
            iei::PROTOCOL_CONFIGURATION_OPTIONS,
            &$self.protocol_configuration_options,
        )?;
        $crate::codec::encode_optional(
            $buf,
            iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            &$self.extended_protocol_configuration_options,
        )
    }};
    (@mask $self:ident) => {{
        use $crate::messages::esm::pco_message_presence as p;

        $crate::messages::presence_mask_of(&[
            (
                $self.protocol_configuration_options.is_some(),
                p::PROTOCOL_CONFIGURATION_OPTIONS,
            ),
            (
                $self.extended_protocol_configuration_options.is_some(),
                p::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            ),
        ])
    }};
}

/// Implements a reject carrying an ESM cause, configuration options and the
/// back-off timer / re-attempt indicator pair.
macro_rules! back_off_reject {
    ($(#[$doc:meta])* $name:ident, $kind:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            /// ESM cause (mandatory, V)
            pub esm_cause: $crate::enums::EsmCause,
            /// Protocol configuration options (TLV, IEI 0x27)
            pub protocol_configuration_options:
                Option<$crate::ies::ProtocolConfigurationOptions>,
            /// T3396 value (TLV, IEI 0x37)
            pub back_off_timer: Option<$crate::ies::GprsTimer3>,
            /// Re-attempt indicator (TLV, IEI 0x6B)
            pub re_attempt_indicator: Option<$crate::ies::ReAttemptIndicator>,
            /// Extended protocol configuration options (TLV-E, IEI 0x7B)
            pub extended_protocol_configuration_options:
                Option<$crate::ies::ExtendedProtocolConfigurationOptions>,
        }

        impl $name {
            /// Create a reject carrying only the cause
            pub fn new(esm_cause: $crate::enums::EsmCause) -> Self {
                Self {
                    esm_cause,
                    protocol_configuration_options: None,
                    back_off_timer: None,
                    re_attempt_indicator: None,
                    extended_protocol_configuration_options: None,
                }
            }
        }

        impl $crate::messages::EsmMessageBody for $name {
            const MESSAGE_TYPE: $crate::enums::EsmMessageType =
                $crate::enums::EsmMessageType::$kind;
            const NAME: &'static str = $label;

            fn decode_body<B: ::bytes::Buf>(buf: &mut B) -> $crate::codec::NasResult<Self> {
                use $crate::codec::NasDecode;
                use $crate::ies::{
                    ExtendedProtocolConfigurationOptions, GprsTimer3,
                    ProtocolConfigurationOptions, ReAttemptIndicator,
                };
                use $crate::messages::esm::esm_common_iei as iei;

                $crate::codec::check_mandatory_length(buf, 1)?;
                let mut msg = Self::new($crate::enums::EsmCause::nas_decode(buf)?);

                while let Some((raw, key)) = $crate::messages::next_iei(buf) {
                    match key {
                        iei::PROTOCOL_CONFIGURATION_OPTIONS => {
                            $crate::messages::keep_first(
                                &mut msg.protocol_configuration_options,
                                Self::NAME,
                                raw,
                                ProtocolConfigurationOptions::nas_decode(buf)?,
                            )
                        }
                        iei::BACK_OFF_TIMER => {
                            $crate::messages::keep_first(
                                &mut msg.back_off_timer,
                                Self::NAME,
                                raw,
                                GprsTimer3::nas_decode(buf)?,
                            )
                        }
                        iei::RE_ATTEMPT_INDICATOR => {
                            $crate::messages::keep_first(
                                &mut msg.re_attempt_indicator,
                                Self::NAME,
                                raw,
                                ReAttemptIndicator::nas_decode(buf)?,
                            )
                        }
                        iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS => {
                            $crate::messages::keep_first(
                                &mut msg.extended_protocol_configuration_options,
                                Self::NAME,
                                raw,
                                ExtendedProtocolConfigurationOptions::nas_decode(buf)?,
                            )
                        }
                        _ => return Err($crate::messages::unexpected_iei(Self::NAME, raw)),
                    }
                }

                Ok(msg)
            }

            fn encode_body<B: ::bytes::BufMut>(&self, buf: &mut B) -> $crate::codec::NasResult<()> {
                use $crate::codec::{encode_optional, NasEncode};
                use $crate::messages::esm::esm_common_iei as iei;

                self.esm_cause.nas_encode(buf)?;
                encode_optional(
                    buf,
                    iei::PROTOCOL_CONFIGURATION_OPTIONS,
                    &self.protocol_configuration_options,
                )?;
                encode_optional(buf, iei::BACK_OFF_TIMER, &self.back_off_timer)?;
                encode_optional(buf, iei::RE_ATTEMPT_INDICATOR, &self.re_attempt_indicator)?;
                encode_optional(
                    buf,
                    iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
                    &self.extended_protocol_configuration_options,
                )
            }

            fn presence_mask(&self) -> u32 {
                use $crate::messages::esm::back_off_reject_presence as p;

                $crate::messages::presence_mask_of(&[
                    (
                        self.protocol_configuration_options.is_some(),
                        p::PROTOCOL_CONFIGURATION_OPTIONS,
                    ),
                    (self.back_off_timer.is_some(), p::BACK_OFF_TIMER),
                    (self.re_attempt_indicator.is_some(), p::RE_ATTEMPT_INDICATOR),
                    (
                        self.extended_protocol_configuration_options.is_some(),
                        p::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
                    ),
                ])
            }
        }
    };
}

pub mod bearer_resource;
pub mod deactivate_bearer;
pub mod dedicated_bearer;
pub mod default_bearer;
mod information;
pub mod modify_bearer;
pub mod pdn_connectivity;
mod pdn_disconnect;
mod status;

pub use bearer_resource::*;
pub use deactivate_bearer::*;
pub use dedicated_bearer::*;
pub use default_bearer::*;
pub use information::*;
pub use modify_bearer::*;
pub use pdn_connectivity::*;
pub use pdn_disconnect::*;
pub use status::*;
