//! Well-known MIME type registry used by composite metadata.

/// A MIME type with a reserved 7-bit identifier in the RSocket registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WellKnownMimeType {
    id: u8,
    mime: &'static str,
}

macro_rules! well_known {
    ($($name:ident = ($id:expr, $mime:expr),)*) => {
        impl WellKnownMimeType {
            $(pub const $name: WellKnownMimeType = WellKnownMimeType { id: $id, mime: $mime };)*

            const ALL: &'static [WellKnownMimeType] = &[$(WellKnownMimeType::$name,)*];
        }
    };
}

well_known! {
    APPLICATION_AVRO = (0x00, "application/avro"),
    APPLICATION_CBOR = (0x01, "application/cbor"),
    APPLICATION_GRAPHQL = (0x02, "application/graphql"),
    APPLICATION_GZIP = (0x03, "application/gzip"),
    APPLICATION_JAVASCRIPT = (0x04, "application/javascript"),
    APPLICATION_JSON = (0x05, "application/json"),
    APPLICATION_OCTET_STREAM = (0x06, "application/octet-stream"),
    APPLICATION_PDF = (0x07, "application/pdf"),
    APPLICATION_THRIFT = (0x08, "application/vnd.apache.thrift.binary"),
    APPLICATION_PROTOBUF = (0x09, "application/vnd.google.protobuf"),
    APPLICATION_XML = (0x0A, "application/xml"),
    APPLICATION_ZIP = (0x0B, "application/zip"),
    AUDIO_AAC = (0x0C, "audio/aac"),
    AUDIO_MP3 = (0x0D, "audio/mp3"),
    AUDIO_MP4 = (0x0E, "audio/mp4"),
    AUDIO_MPEG3 = (0x0F, "audio/mpeg3"),
    AUDIO_MPEG = (0x10, "audio/mpeg"),
    AUDIO_OGG = (0x11, "audio/ogg"),
    AUDIO_OPUS = (0x12, "audio/opus"),
    AUDIO_VORBIS = (0x13, "audio/vorbis"),
    IMAGE_BMP = (0x14, "image/bmp"),
    IMAGE_GIF = (0x15, "image/gif"),
    IMAGE_HEIC_SEQUENCE = (0x16, "image/heic-sequence"),
    IMAGE_HEIC = (0x17, "image/heic"),
    IMAGE_HEIF_SEQUENCE = (0x18, "image/heif-sequence"),
    IMAGE_HEIF = (0x19, "image/heif"),
    IMAGE_JPEG = (0x1A, "image/jpeg"),
    IMAGE_PNG = (0x1B, "image/png"),
    IMAGE_TIFF = (0x1C, "image/tiff"),
    MULTIPART_MIXED = (0x1D, "multipart/mixed"),
    TEXT_CSS = (0x1E, "text/css"),
    TEXT_CSV = (0x1F, "text/csv"),
    TEXT_HTML = (0x20, "text/html"),
    TEXT_PLAIN = (0x21, "text/plain"),
    TEXT_XML = (0x22, "text/xml"),
    VIDEO_H264 = (0x23, "video/H264"),
    VIDEO_H265 = (0x24, "video/H265"),
    VIDEO_VP8 = (0x25, "video/VP8"),
    APPLICATION_HESSIAN = (0x26, "application/x-hessian"),
    APPLICATION_JAVA_OBJECT = (0x27, "application/x-java-object"),
    APPLICATION_CLOUDEVENTS_JSON = (0x28, "application/cloudevents+json"),
    APPLICATION_CAPNP = (0x29, "application/x-capnp"),
    APPLICATION_FLATBUFFERS = (0x2A, "application/x-flatbuffers"),
    MESSAGE_RSOCKET_MIMETYPE = (0x7A, "message/x.rsocket.mime-type.v0"),
    MESSAGE_RSOCKET_ACCEPT_MIMETYPES = (0x7B, "message/x.rsocket.accept-mime-types.v0"),
    MESSAGE_RSOCKET_AUTHENTICATION = (0x7C, "message/x.rsocket.authentication.v0"),
    MESSAGE_RSOCKET_TRACING_ZIPKIN = (0x7D, "message/x.rsocket.tracing-zipkin.v0"),
    MESSAGE_RSOCKET_ROUTING = (0x7E, "message/x.rsocket.routing.v0"),
    MESSAGE_RSOCKET_COMPOSITE_METADATA = (0x7F, "message/x.rsocket.composite-metadata.v0"),
}

impl WellKnownMimeType {
    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn as_str(&self) -> &'static str {
        self.mime
    }

    /// `None` for ids the registry reserves but has not assigned yet.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().find(|known| known.id == id).copied()
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::ALL.iter().find(|known| known.mime == mime).copied()
    }
}
