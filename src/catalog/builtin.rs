//! Built-in catalog data
//!
//! Winget identifiers for the default tool set. Tools without an entry are
//! passed to the package manager under their display name.

use super::Category;
use std::collections::HashMap;

pub(super) fn categories() -> Vec<Category> {
    vec![
        Category::new(
            "Daily Use",
            &[
                "Google Chrome", "Visual Studio Code", "Notepad++", "Slack", "Zoom",
                "VLC Media Player", "Spotify", "LibreOffice", "7-Zip", "Adobe Acrobat Reader",
                "Firefox", "Opera", "Brave", "Thunderbird", "OneNote",
                "Microsoft Teams", "Dropbox", "GIMP", "Paint.NET", "KeePass",
            ],
        ),
        Category::new(
            "OSINT",
            &[
                "Maltego", "Wireshark", "Shodan", "Spiderfoot", "Recon-ng",
                "Metasploit", "Burp Suite", "OWASP ZAP", "theHarvester", "Nmap",
                "Amass", "Nikto", "Sherlock", "Censys", "Photon",
                "Netcraft", "FOCA", "Datasploit", "GHunt",
            ],
        ),
        Category::new(
            "Cybersecurity",
            &[
                "Kali Linux", "Metasploit", "Wireshark", "OpenVPN", "KeePass",
                "VeraCrypt", "Gpg4win", "Burp Suite", "OWASP ZAP", "Tor Browser",
                "John the Ripper", "Hydra", "Hashcat", "Aircrack-ng", "Responder",
                "SQLMap", "Snort", "Suricata", "Nessus", "Maltego",
            ],
        ),
        Category::new(
            "System Tools",
            &[
                "Sysinternals Suite", "Process Hacker", "Autoruns", "Process Explorer",
                "HWiNFO", "CrystalDiskInfo", "Speccy", "GPU-Z", "Core Temp", "TCPView",
                "PowerToys", "Everything", "CCleaner", "TreeSize", "Recuva",
                "Rufus", "DiskGenius", "HWMonitor", "FastCopy", "Ventoy",
            ],
        ),
        Category::new(
            "Communication",
            &[
                "Discord", "Telegram", "Signal", "WhatsApp", "Skype",
                "Slack", "Zoom", "Microsoft Teams", "Google Meet", "Viber",
                "WeChat", "Facebook Messenger", "Line", "Wire", "ICQ",
                "Tox", "Mattermost", "Element", "Trillian", "Jitsi",
            ],
        ),
        Category::new(
            "Multimedia",
            &[
                "VLC Media Player", "Spotify", "Audacity", "GIMP", "Inkscape",
                "Blender", "Adobe Premiere Pro", "DaVinci Resolve", "Shotcut", "OBS Studio",
                "Krita", "HandBrake", "KMPlayer", "Media Player Classic", "Avidemux",
                "FL Studio", "Mixxx", "Ableton Live", "Cubase", "Kdenlive",
            ],
        ),
        Category::new(
            "Office & PDF",
            &[
                "LibreOffice", "Microsoft Word", "Adobe Acrobat Reader", "Foxit Reader",
                "SumatraPDF", "Google Docs", "WPS Office", "OnlyOffice", "Notion", "Evernote",
                "Dropbox Paper", "Zoho Docs", "OneDrive", "Quip", "SoftMaker Office",
                "Nitro PDF", "Scribus", "Polaris Office", "AbiWord", "Mendeley",
            ],
        ),
    ]
}

pub(super) fn identifiers() -> HashMap<String, String> {
    [
        // Daily use
        ("Google Chrome", "Google.Chrome"),
        ("Visual Studio Code", "Microsoft.VisualStudioCode"),
        ("Notepad++", "Notepad++.Notepad++"),
        ("Slack", "SlackTechnologies.Slack"),
        ("Zoom", "Zoom.Zoom"),
        ("VLC Media Player", "VideoLAN.VLC"),
        ("Spotify", "Spotify.Spotify"),
        ("LibreOffice", "TheDocumentFoundation.LibreOffice"),
        ("7-Zip", "7zip.7zip"),
        ("Adobe Acrobat Reader", "Adobe.AdobeAcrobatReaderDC"),
        ("Firefox", "Mozilla.Firefox"),
        ("Opera", "Opera.Opera"),
        ("Brave", "Brave.Brave"),
        ("Thunderbird", "Mozilla.Thunderbird"),
        ("OneNote", "Microsoft.OneNote"),
        ("Microsoft Teams", "Microsoft.Teams"),
        ("Dropbox", "Dropbox.Dropbox"),
        ("GIMP", "GIMP.GIMP"),
        ("Paint.NET", "dotPDNLLC.Paint.NET"),
        ("KeePass", "DominikReichl.KeePass"),
        // OSINT
        ("Maltego", "Paterva.MaltegoCE"),
        ("Wireshark", "WiresharkFoundation.Wireshark"),
        ("Shodan", "Shodan.Shodan"),
        ("Spiderfoot", "Spiderfoot.Spiderfoot"),
        ("Recon-ng", "Recon-ng.Recon-ng"),
        ("Metasploit", "Rapid7.Metasploit"),
        ("Burp Suite", "PortSwigger.BurpSuiteFree"),
        ("OWASP ZAP", "OWASP.ZAP"),
        ("theHarvester", "theHarvester.theHarvester"),
        ("Nmap", "Nmap.Nmap"),
        // Cybersecurity
        ("Kali Linux", "KaliLinux.KaliLinux"),
        ("OpenVPN", "OpenVPNTechnologies.OpenVPN"),
        ("Tor Browser", "TorProject.TorBrowser"),
        ("John the Ripper", "Openwall.JohnTheRipper"),
        ("Hydra", "THC-Hydra.Hydra"),
        ("Hashcat", "hashcat.hashcat"),
        ("VeraCrypt", "IDRIX.VeraCrypt"),
        ("Gpg4win", "Gpg4win.Gpg4win"),
        // System tools
        ("Sysinternals Suite", "Microsoft.SysinternalsSuite"),
        ("Process Hacker", "wj32.ProcessHacker"),
        ("Autoruns", "Microsoft.SysinternalsAutoruns"),
        ("Process Explorer", "Microsoft.SysinternalsProcessExplorer"),
        ("TCPView", "Microsoft.SysinternalsTCPView"),
        ("HWiNFO", "Realix.HWiNFO"),
        // Communication
        ("Discord", "Discord.Discord"),
        ("Telegram", "Telegram.TelegramDesktop"),
        ("Signal", "OpenWhisperSystems.Signal"),
        ("WhatsApp", "WhatsApp.WhatsApp"),
        ("Skype", "Microsoft.Skype"),
        // Multimedia
        ("Audacity", "Audacity.Audacity"),
        ("Inkscape", "Inkscape.Inkscape"),
        ("Blender", "BlenderFoundation.Blender"),
        ("OBS Studio", "OBSProject.OBSStudio"),
        ("Krita", "Krita.Krita"),
        // Office & PDF
        ("Foxit Reader", "FoxitSoftware.FoxitReader"),
        ("SumatraPDF", "SumatraPDF.SumatraPDF"),
        ("Evernote", "Evernote.Evernote"),
    ]
    .into_iter()
    .map(|(name, id)| (name.to_string(), id.to_string()))
    .collect()
}
