#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Launcher icon bytes that happen to contain a placeholder.
pub const ICON_BYTES: &[u8] = b"RIFF\x00\x00\x00\x00WEBPCodeBase\x00com.dailystudio.codebase";

/// Writes `files` (path, contents) below `root`.
pub fn write_files(root: &Path, files: &[(&str, &[u8])]) {
    for (path, contents) in files {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
}

/// A small copy of the Android codebase template.
pub fn android_template(root: &Path) {
    write_files(
        root,
        &[
            (
                "settings.gradle",
                b"rootProject.name = \"Code Base\"\ninclude ':app'\ninclude ':app-compose'\ninclude ':core-native'\n",
            ),
            (
                "app/build.gradle",
                b"android {\n    namespace 'com.dailystudio.codebase'\n    versionName \"1.0.0\"\n}\ndependencies {\n    implementation project(':core-native')\n}\n",
            ),
            (
                "app/src/main/java/com/dailystudio/codebase/CodeBaseApplication.kt",
                b"package com.dailystudio.codebase\n\nclass CodeBaseApplication : Application()\n",
            ),
            (
                "app/src/test/java/com/dailystudio/codebase/CodeBaseTest.kt",
                b"package com.dailystudio.codebase\n\nclass CodeBaseTest\n",
            ),
            (
                "app/src/main/res/values/strings.xml",
                b"<resources>\n    <string name=\"app_name\">Code Base</string>\n</resources>\n",
            ),
            ("app/src/main/res/mipmap-mdpi/ic_launcher.webp", ICON_BYTES),
            ("app/build/outputs/apk/app-debug.apk", b"stale"),
            (
                "app-compose/src/main/java/com/dailystudio/codebase/CodeBaseActivity.kt",
                b"package com.dailystudio.codebase\n",
            ),
            (
                "core-native/src/main/cpp/nativelib.cpp",
                b"extern \"C\" jstring Java_com_dailystudio_codebase_NativeLib_stringFromJNI();\n",
            ),
            (
                "core-native/src/main/java/com/dailystudio/codebase/NativeLib.kt",
                b"package com.dailystudio.codebase\n",
            ),
            (".gradle/8.0/fileHashes.lock", b"lock"),
        ],
    );
}

/// A small copy of the Express server codebase template.
pub fn server_template(root: &Path) {
    write_files(
        root,
        &[
            (
                "package.json",
                b"{\n  \"name\": \"codebase\",\n  \"version\": \"1.0.0\",\n  \"description\": \"Code Base server\"\n}\n",
            ),
            (
                "src/codeBaseRouter.js",
                b"const codeBaseRouter = express.Router();\ncodeBaseRouter.get('/v1/codebase/echo', echo);\n",
            ),
            ("src/server.js", b"const DEFAULT_PORT = 1809;\n"),
            ("public/favicon.ico", b"\x00\x00\x01\x00codebase"),
            ("node_modules/express/index.js", b"module.exports = {};\n"),
        ],
    );
}
