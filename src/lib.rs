/*!
# Graph Gallery

A small web gallery for saving, browsing, editing and deleting graph
definitions (formula, colour, tags, author) for a browser-side plotting widget.

## Architecture

### Storage Layer
- **Record Store** - the whole collection lives in one pretty-printed JSON
  array on disk. Every operation re-reads the file; every mutation rewrites it.
  There is no locking, so two overlapping writers can lose an update.
- **Tag Index** - the sorted set of distinct tags, derived on request.

### HTTP Layer (`web` feature)
- **CRUD API** - validates payloads, delegates to the store and maps outcomes
  to status codes with `{error, message}` bodies on failure.
- **Script relay** - serves the plotting widget scripts from our own origin.
- **Static files** - the gallery client, served as the router fallback.

## REST API Endpoints

- `GET /api/graphs` - list every graph
- `POST /api/graphs` - create a graph (`title`, `formula`, `type` required)
- `GET /api/graphs/{id}` - fetch one graph
- `PUT /api/graphs/{id}` - shallow-merge the supplied fields
- `DELETE /api/graphs/{id}` - remove a graph
- `GET /api/tags` - distinct tags, sorted
- `GET /api/v1.12/{calculator.js,calculator3d.js}` - widget scripts

## Modules

- **record**: `GraphRecord`, create drafts and update patches
- **store**: flat-file persistence
- **tags**: tag aggregation
- **config**: environment configuration
- **error**: error type shared by every layer
- **api**, **scripts**, **app**: handlers, script relay, router and server
*/

pub mod config;
pub mod error;
pub mod record;
pub mod store;
pub mod tags;

#[cfg(feature = "web")]
pub mod api;
#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod scripts;

/// Re-export the core types to make them easier to use
pub use config::Config;
pub use error::{GalleryError, GalleryResult};
pub use record::{GraphDraft, GraphPatch, GraphRecord, GraphType};
pub use store::RecordStore;
pub use tags::unique_sorted_tags;
