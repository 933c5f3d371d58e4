//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

pub const IDRP_DISCRIMINATOR: u8 = 0x83;
pub const VERSION_PROTO_EXT: u8 = 1;
pub const VERSION: u8 = 1;
pub const SYSTEM_ID_LEN: u8 = 6;
pub const MAX_SYSTEM_ID_LEN: u8 = 8;

// IS-IS PDU types.
//
// IANA registry:
// https://www.iana.org/assignments/isis-pdu/isis-pdu.xhtml#pdu
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum PduType {
    HelloLanL1 = 15,
    HelloLanL2 = 16,
    HelloP2P = 17,
    LspL1 = 18,
    LspL2 = 20,
    CsnpL1 = 24,
    CsnpL2 = 25,
    PsnpL1 = 26,
    PsnpL2 = 27,
}

// IS-IS top-level TLV types found in LSPs.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#tlv-codepoints
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum TlvType {
    AreaAddresses = 1,
    IsReach = 2,
    EsNeighbors = 3,
    PartitionDis = 4,
    PrefixNeighbors = 5,
    InstanceId = 7,
    Authentication = 10,
    PurgeOriginatorId = 13,
    LspBufferSize = 14,
    ExtIsReach = 22,
    Srv6Locator = 27,
    Ipv4InternalReach = 128,
    ProtocolsSupported = 129,
    Ipv4ExternalReach = 130,
    Ipv4Addresses = 132,
    IpAuthentication = 133,
    Ipv4RouterId = 134,
    ExtIpv4Reach = 135,
    DynamicHostname = 137,
    SharedRiskLinkGroup = 138,
    Ipv6RouterId = 140,
    MtCapability = 144,
    MacReachability = 147,
    SidLabelBinding = 149,
    MtSidLabelBinding = 150,
    AvayaIpvpn = 184,
    AvayaIpvpnMcast = 185,
    AvayaIpGrtMcast = 186,
    MtIsReach = 222,
    MultiTopology = 229,
    Ipv6Addresses = 232,
    MtIpv4Reach = 235,
    Ipv6Reach = 236,
    MtIpv6Reach = 237,
    RouterCapability = 242,
}

// IS-IS Authentication Type Codes.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#isis-tlv-codepoints-10
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum AuthenticationType {
    ClearText = 1,
    Cryptographic = 3,
    HmacMd5 = 54,
}

// IS-IS Sub-TLVs for TLVs Advertising Neighbor Information.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#isis-tlv-codepoints-advertising-neighbor-information
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum NeighborStlvType {
    AdminGroup = 3,
    LinkLocalRemoteIds = 4,
    Ipv4InterfaceAddress = 6,
    Ipv4NeighborAddress = 8,
    MaxLinkBandwidth = 9,
    MaxResvLinkBandwidth = 10,
    UnreservedBandwidth = 11,
    Ipv6InterfaceAddress = 12,
    Ipv6NeighborAddress = 13,
    ExtAdminGroup = 14,
    LinkMsd = 15,
    AppSpecLinkAttrs = 16,
    TeDefaultMetric = 18,
    BandwidthConstraints = 22,
    SpbLinkMetric = 29,
    AdjacencySid = 31,
    LanAdjacencySid = 32,
    UniLinkDelay = 33,
    MinMaxUniLinkDelay = 34,
    UniDelayVariation = 35,
    UniLinkLoss = 36,
    UniResidualBandwidth = 37,
    UniAvailableBandwidth = 38,
    UniUtilizedBandwidth = 39,
    Srv6EndXSid = 43,
    Srv6LanEndXSid = 44,
}

// IS-IS Sub-TLVs for TLVs Advertising Prefix Reachability.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#isis-tlv-codepoints-advertising-prefix-reachability
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum PrefixStlvType {
    AdminTag32 = 1,
    AdminTag64 = 2,
    PrefixSid = 3,
    PrefixAttributeFlags = 4,
    Ipv4SourceRouterId = 11,
    Ipv6SourceRouterId = 12,
    BierInfo = 32,
}

// IS-IS Sub-TLVs for the Router Capability TLV.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#isis-tlv-codepoints-242
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum RouterCapStlvType {
    TeNodeCapDescriptor = 1,
    SrCapability = 2,
    TrillNickname = 6,
    TrillTrees = 7,
    TrillTreeRootIds = 8,
    TrillTreesUsedIds = 9,
    TrillInterestedVlans = 10,
    Ipv6TeRouterId = 12,
    TrillVersion = 13,
    TrillVlanGroup = 14,
    SrAlgorithm = 19,
    NodeAdminTag = 21,
    SrLocalBlock = 22,
    NodeMsd = 23,
    Srv6Capability = 25,
    FlexAlgoDefinition = 26,
}

// IS-IS Sub-TLVs for the MT-Capability TLV.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#isis-tlv-codepoints-144
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum MtCapStlvType {
    SpbInstance = 1,
    SpbOpaqueAlgo = 2,
    SpbmSi = 3,
    SpbvMacAddr = 4,
}

// IS-IS Sub-Sub-TLVs for the Flexible Algorithm Definition Sub-TLV.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#isis-sub-sub-tlvs-for-flex-algo-def-sub-tlv
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum FadStlvType {
    ExcludeAdminGroup = 1,
    IncludeAnyAdminGroup = 2,
    IncludeAllAdminGroup = 3,
    Flags = 4,
    ExcludeSrlg = 5,
}

// IS-IS Sub-TLVs for Segment Identifier/Label Binding TLVs.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#tlv-149-150
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum LabelBindingStlvType {
    SidLabel = 1,
    PrefixSid = 3,
}

// IS-IS Sub-TLVs for the SRv6 Locator TLV.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#isis-sub-tlvs-for-srv6-locator
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum Srv6LocatorStlvType {
    PrefixAttributeFlags = 4,
    EndSid = 5,
}

// IS-IS Sub-Sub-TLVs for SRv6 SID Sub-TLVs.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#isis-sub-sub-tlvs-for-srv6-sid
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum Srv6SidStlvType {
    SidStructure = 1,
}

// IS-IS Sub-Sub-TLVs for BIER Info Sub-TLV.
//
// IANA Registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#bier-info-sub-tlv
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum BierSubStlvType {
    MplsEncap = 1,
}

// Sub-TLVs of the Avaya IPVPN TLV. These are vendor specific and have no
// IANA registry; the codes mirror the matching top-level TLVs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum AvayaIpvpnStlvType {
    Ipv4MetricType = 1,
    Ipv4Reach = 135,
    Ipv6Reach = 236,
}

// Network Layer Protocol Identifiers (NLPIDs).
//
// IANA Registry:
// https://www.iana.org/assignments/nlpids/nlpids.xhtml
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum Nlpid {
    Ipv6 = 0x8E,
    Ipv4 = 0xCC,
}

// IS-IS Multi-Topology ID Values.
//
// IANA registry:
// https://www.iana.org/assignments/isis-mt-parameters/isis-mt-parameters.xhtml
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum MtId {
    Standard = 0,
    Ipv4Mgmt = 1,
    Ipv6Unicast = 2,
    Ipv4Multicast = 3,
    Ipv6Multicast = 4,
    Ipv6Mgmt = 5,
    Development = 4095,
}

// IGP Algorithm Types.
//
// IANA registry:
// https://www.iana.org/assignments/igp-parameters/igp-parameters.xhtml#igp-algorithm-types
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum IgpAlgoType {
    Spf = 0,
    StrictSpf = 1,
}

// IGP MSD-Types.
//
// IANA registry:
// https://www.iana.org/assignments/igp-parameters/igp-parameters.xhtml#igp-msd-types
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum MsdType {
    BaseMplsImposition = 1,
    Erld = 2,
    Srv6MaxSegmentsLeft = 41,
    Srv6MaxEndPop = 42,
    Srv6MaxHEncaps = 44,
    Srv6MaxEndD = 45,
}

// SRv6 Endpoint Behaviors.
//
// IANA registry:
// https://www.iana.org/assignments/segment-routing/segment-routing.xhtml#srv6-endpoint-behaviors
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum Srv6EndpointBehavior {
    End = 1,
    EndPsp = 2,
    EndUsp = 3,
    EndPspUsp = 4,
    EndX = 5,
    EndXPsp = 6,
    EndXUsp = 7,
    EndXPspUsp = 8,
    EndT = 9,
    EndDx6 = 16,
    EndDx4 = 17,
    EndDt6 = 18,
    EndDt4 = 19,
    EndDt46 = 20,
}

// ===== impl PduType =====

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PduType::HelloLanL1 => write!(f, "L1 LAN IIH"),
            PduType::HelloLanL2 => write!(f, "L2 LAN IIH"),
            PduType::HelloP2P => write!(f, "P2P IIH"),
            PduType::LspL1 => write!(f, "L1 LSP"),
            PduType::LspL2 => write!(f, "L2 LSP"),
            PduType::CsnpL1 => write!(f, "L1 CSNP"),
            PduType::CsnpL2 => write!(f, "L2 CSNP"),
            PduType::PsnpL1 => write!(f, "L1 PSNP"),
            PduType::PsnpL2 => write!(f, "L2 PSNP"),
        }
    }
}

// ===== impl AuthenticationType =====

impl std::fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthenticationType::ClearText => write!(f, "clear text"),
            AuthenticationType::Cryptographic => write!(f, "cryptographic"),
            AuthenticationType::HmacMd5 => write!(f, "HMAC-MD5"),
        }
    }
}

// ===== impl Nlpid =====

impl std::fmt::Display for Nlpid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Nlpid::Ipv4 => write!(f, "IPv4"),
            Nlpid::Ipv6 => write!(f, "IPv6"),
        }
    }
}

// ===== impl MtId =====

impl std::fmt::Display for MtId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtId::Standard => write!(f, "IPv4 unicast"),
            MtId::Ipv4Mgmt => write!(f, "IPv4 in-band management"),
            MtId::Ipv6Unicast => write!(f, "IPv6 unicast"),
            MtId::Ipv4Multicast => write!(f, "IPv4 multicast"),
            MtId::Ipv6Multicast => write!(f, "IPv6 multicast"),
            MtId::Ipv6Mgmt => write!(f, "IPv6 in-band management"),
            MtId::Development => write!(f, "development"),
        }
    }
}

// ===== impl IgpAlgoType =====

impl std::fmt::Display for IgpAlgoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgpAlgoType::Spf => write!(f, "Shortest Path First"),
            IgpAlgoType::StrictSpf => write!(f, "Strict Shortest Path First"),
        }
    }
}

// ===== impl MsdType =====

impl std::fmt::Display for MsdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MsdType::BaseMplsImposition => write!(f, "Base MPLS Imposition"),
            MsdType::Erld => write!(f, "ERLD"),
            MsdType::Srv6MaxSegmentsLeft => write!(f, "SRH Max SL"),
            MsdType::Srv6MaxEndPop => write!(f, "SRH Max End Pop"),
            MsdType::Srv6MaxHEncaps => write!(f, "SRH Max H.encaps"),
            MsdType::Srv6MaxEndD => write!(f, "SRH Max End D"),
        }
    }
}

// ===== impl Srv6EndpointBehavior =====

impl std::fmt::Display for Srv6EndpointBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Srv6EndpointBehavior::End => write!(f, "End"),
            Srv6EndpointBehavior::EndPsp => write!(f, "End with PSP"),
            Srv6EndpointBehavior::EndUsp => write!(f, "End with USP"),
            Srv6EndpointBehavior::EndPspUsp => write!(f, "End with PSP & USP"),
            Srv6EndpointBehavior::EndX => write!(f, "End.X"),
            Srv6EndpointBehavior::EndXPsp => write!(f, "End.X with PSP"),
            Srv6EndpointBehavior::EndXUsp => write!(f, "End.X with USP"),
            Srv6EndpointBehavior::EndXPspUsp => {
                write!(f, "End.X with PSP & USP")
            }
            Srv6EndpointBehavior::EndT => write!(f, "End.T"),
            Srv6EndpointBehavior::EndDx6 => write!(f, "End.DX6"),
            Srv6EndpointBehavior::EndDx4 => write!(f, "End.DX4"),
            Srv6EndpointBehavior::EndDt6 => write!(f, "End.DT6"),
            Srv6EndpointBehavior::EndDt4 => write!(f, "End.DT4"),
            Srv6EndpointBehavior::EndDt46 => write!(f, "End.DT46"),
        }
    }
}
