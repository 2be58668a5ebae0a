mod cache;
mod channel;
mod checksum;
mod index;
mod layout;
mod urls;

pub use cache::{
    find_cache_conflict, is_fetched, record_fetched_url, recorded_qualifier_for_url,
};
pub use channel::{parse_channel_config, ChannelConfig};
pub use checksum::{file_checksum_hex, md5_hex_file, sha256_hex_file, verify_file_checksum};
pub use index::{read_local_channel_index, IndexCache, INDEX_FILE_NAME};
pub use layout::{default_store_root, StoreLayout};
pub use urls::{file_url_from_path, is_url, path_from_file_url, split_location};

#[cfg(test)]
mod tests;
