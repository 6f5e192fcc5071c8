//! Region registry contract and the built-in partition table.

use std::collections::BTreeMap;

use awsctx_core::config::FALLBACK_REGION_ID;
use awsctx_core::{Partition, Region};
use tracing::warn;

/// Known regions, each belonging to a partition.
pub trait RegionRegistry: Send + Sync {
    fn list(&self) -> Vec<Region>;

    fn get(&self, id: &str) -> Option<Region>;

    /// Region used when nothing more specific applies.
    fn default_region(&self) -> Region;

    fn partitions(&self) -> Vec<Partition> {
        Vec::new()
    }

    fn regions_in_partition(&self, partition_id: &str) -> Vec<Region> {
        self.list()
            .into_iter()
            .filter(|r| r.partition_id == partition_id)
            .collect()
    }
}

/// (partition id, description, [(region id, display name)])
const BUILTIN_PARTITIONS: &[(&str, &str, &[(&str, &str)])] = &[
    (
        "aws",
        "AWS Standard",
        &[
            ("af-south-1", "Africa (Cape Town)"),
            ("ap-east-1", "Asia Pacific (Hong Kong)"),
            ("ap-northeast-1", "Asia Pacific (Tokyo)"),
            ("ap-northeast-2", "Asia Pacific (Seoul)"),
            ("ap-northeast-3", "Asia Pacific (Osaka)"),
            ("ap-south-1", "Asia Pacific (Mumbai)"),
            ("ap-south-2", "Asia Pacific (Hyderabad)"),
            ("ap-southeast-1", "Asia Pacific (Singapore)"),
            ("ap-southeast-2", "Asia Pacific (Sydney)"),
            ("ap-southeast-3", "Asia Pacific (Jakarta)"),
            ("ap-southeast-4", "Asia Pacific (Melbourne)"),
            ("ca-central-1", "Canada (Central)"),
            ("eu-central-1", "Europe (Frankfurt)"),
            ("eu-central-2", "Europe (Zurich)"),
            ("eu-north-1", "Europe (Stockholm)"),
            ("eu-south-1", "Europe (Milan)"),
            ("eu-south-2", "Europe (Spain)"),
            ("eu-west-1", "Europe (Ireland)"),
            ("eu-west-2", "Europe (London)"),
            ("eu-west-3", "Europe (Paris)"),
            ("il-central-1", "Israel (Tel Aviv)"),
            ("me-central-1", "Middle East (UAE)"),
            ("me-south-1", "Middle East (Bahrain)"),
            ("sa-east-1", "South America (Sao Paulo)"),
            ("us-east-1", "US East (N. Virginia)"),
            ("us-east-2", "US East (Ohio)"),
            ("us-west-1", "US West (N. California)"),
            ("us-west-2", "US West (Oregon)"),
        ],
    ),
    (
        "aws-cn",
        "AWS China",
        &[
            ("cn-north-1", "China (Beijing)"),
            ("cn-northwest-1", "China (Ningxia)"),
        ],
    ),
    (
        "aws-us-gov",
        "AWS GovCloud (US)",
        &[
            ("us-gov-east-1", "AWS GovCloud (US-East)"),
            ("us-gov-west-1", "AWS GovCloud (US-West)"),
        ],
    ),
];

/// Immutable region registry backed by a fixed table.
pub struct StaticRegionRegistry {
    partitions: Vec<Partition>,
    regions: BTreeMap<String, Region>,
    default_region_id: String,
}

impl StaticRegionRegistry {
    /// Registry of the standard partitions with the given default region.
    ///
    /// An unknown default falls back to `us-east-1`.
    pub fn builtin(default_region_id: &str) -> Self {
        let mut partitions = Vec::with_capacity(BUILTIN_PARTITIONS.len());
        let mut regions = Vec::new();
        for (partition_id, description, members) in BUILTIN_PARTITIONS {
            partitions.push(Partition {
                id: partition_id.to_string(),
                description: description.to_string(),
            });
            regions.extend(
                members
                    .iter()
                    .map(|(id, name)| Region::new(*id, *name, *partition_id)),
            );
        }
        Self::new(partitions, regions, default_region_id)
    }

    pub fn new(
        partitions: Vec<Partition>,
        regions: impl IntoIterator<Item = Region>,
        default_region_id: &str,
    ) -> Self {
        let regions: BTreeMap<String, Region> =
            regions.into_iter().map(|r| (r.id.clone(), r)).collect();

        let default_region_id = if regions.contains_key(default_region_id) {
            default_region_id.to_string()
        } else {
            warn!(
                region = %default_region_id,
                fallback = FALLBACK_REGION_ID,
                "Unknown default region, using fallback"
            );
            FALLBACK_REGION_ID.to_string()
        };

        Self {
            partitions,
            regions,
            default_region_id,
        }
    }
}

impl RegionRegistry for StaticRegionRegistry {
    fn list(&self) -> Vec<Region> {
        self.regions.values().cloned().collect()
    }

    fn get(&self, id: &str) -> Option<Region> {
        self.regions.get(id).cloned()
    }

    fn default_region(&self) -> Region {
        self.regions
            .get(&self.default_region_id)
            .cloned()
            .unwrap_or_else(|| Region::new(FALLBACK_REGION_ID, "US East (N. Virginia)", "aws"))
    }

    fn partitions(&self) -> Vec<Partition> {
        self.partitions.clone()
    }
}
